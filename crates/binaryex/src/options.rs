//! Decoder configuration.

/// Options controlling decoding behaviour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DecoderOptions {
    /// Upper bound for any decoded text length, sequence count, map count or
    /// override blob length. `None` leaves only the platform limit in place.
    pub max_length: Option<usize>,
}

impl DecoderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets [`DecoderOptions::max_length`].
    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_unbounded() {
        assert_eq!(DecoderOptions::default().max_length, None);
    }

    #[test]
    fn builder_sets_limit() {
        assert_eq!(DecoderOptions::new().max_length(16).max_length, Some(16));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn loads_from_host_configuration() {
        let options: DecoderOptions = serde_json::from_str(r#"{"max_length": 4096}"#).unwrap();
        assert_eq!(options, DecoderOptions::new().max_length(4096));

        let options: DecoderOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, DecoderOptions::default());
    }
}
