use serde::Deserialize;

/// Error envelope returned by the Track API on non-2xx responses.
///
/// Customer.io reports either a single `meta.error` string or a list under
/// `meta.errors`, depending on the endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub meta: Option<ErrorMeta>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorMeta {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub errors: Vec<String>,
}

impl ErrorBody {
    pub(crate) fn into_message(self) -> Option<String> {
        let meta = self.meta?;
        if let Some(error) = meta.error.filter(|e| !e.is_empty()) {
            return Some(error);
        }
        if meta.errors.is_empty() {
            None
        } else {
            Some(meta.errors.join("; "))
        }
    }
}
