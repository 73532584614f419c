//! Caller location captured at the logging call site

use std::panic::Location;
use std::path::Path;

/// Source location of a logging call.
///
/// Plain function entry points are `#[track_caller]`, so [`CallSite::caller`]
/// resolves to the application line that invoked them. The function name is
/// not part of [`Location`]; the crate's macros fill it in from the enclosing
/// item's type path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSite {
    function: Option<&'static str>,
    file: &'static str,
    line: u32,
}

impl CallSite {
    pub const fn new(function: Option<&'static str>, file: &'static str, line: u32) -> Self {
        Self {
            function,
            file,
            line,
        }
    }

    /// Location of the caller of the current `#[track_caller]` chain
    #[track_caller]
    pub fn caller() -> Self {
        let location = Location::caller();
        Self::new(None, location.file(), location.line())
    }

    /// Innermost function name with module path and closure markers stripped
    ///
    /// `my_app::worker::run::{{closure}}` becomes `run`.
    pub fn function_name(&self) -> Option<&'static str> {
        let path = self.function?;
        path.split("::")
            .filter(|segment| !segment.is_empty() && *segment != "{{closure}}")
            .last()
    }

    /// Base file name with the directory path stripped
    pub fn file_name(&self) -> &'static str {
        Path::new(self.file)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(self.file)
    }

    pub fn line(&self) -> u32 {
        self.line
    }
}

/// Expands to the fully qualified path of the enclosing function
#[doc(hidden)]
#[macro_export]
macro_rules! __function_path {
    () => {{
        fn __here() {}
        fn __type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        let name = __type_name_of(__here);
        name.strip_suffix("::__here").unwrap_or(name)
    }};
}
