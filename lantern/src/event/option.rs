use crate::source::CommandSource;

/// Request for a string-valued option, e.g. a chat prefix.
///
/// The first handler to supply a value wins; later handlers can neither
/// replace nor clear it.
pub struct OptionRequestEvent<'a> {
    source: &'a dyn CommandSource,
    key: &'a str,
    value: Option<String>,
}

impl<'a> OptionRequestEvent<'a> {
    pub(crate) fn new(source: &'a dyn CommandSource, key: &'a str) -> Self {
        Self {
            source,
            key,
            value: None,
        }
    }

    pub fn source(&self) -> &dyn CommandSource {
        self.source
    }

    pub fn key(&self) -> &str {
        self.key
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Offers a value. Ignored once a previous handler has set one.
    pub fn set_value(&mut self, value: impl Into<String>) {
        if self.value.is_none() {
            self.value = Some(value.into());
        }
    }

    pub(crate) fn into_value(self) -> Option<String> {
        self.value
    }
}
