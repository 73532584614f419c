//! Service and caller metadata injected into every record

use super::call_site::CallSite;
use super::fields::Fields;
use super::record::TraceContext;

pub const FIELD_SERVICE_NAME: &str = "serviceName";
pub const FIELD_IP: &str = "ip";
pub const FIELD_FUNC: &str = "func";
pub const FIELD_FILE: &str = "file";
pub const FIELD_LINE: &str = "line";

/// Builds the injected field set for one logging call
#[derive(Debug, Clone, Copy)]
pub struct FieldEnricher<'a> {
    service_name: &'a str,
    host_ip: &'a str,
}

impl<'a> FieldEnricher<'a> {
    pub fn new(service_name: &'a str, host_ip: &'a str) -> Self {
        Self {
            service_name,
            host_ip,
        }
    }

    /// `serviceName` and `ip` are always present; `func`, `file` and `line`
    /// only when the call site is known, `func` only when it carries a name.
    pub fn enrich(&self, call_site: Option<&CallSite>, _ctx: Option<&TraceContext>) -> Fields {
        let mut fields = Fields::new()
            .with_field(FIELD_SERVICE_NAME, self.service_name)
            .with_field(FIELD_IP, self.host_ip);

        // TODO: emit `traceId` from `TraceContext::trace_id` once upstream services propagate it.

        if let Some(site) = call_site {
            if let Some(function) = site.function_name() {
                fields.insert(FIELD_FUNC, function);
            }
            fields.insert(FIELD_FILE, site.file_name());
            fields.insert(FIELD_LINE, site.line());
        }
        fields
    }
}
