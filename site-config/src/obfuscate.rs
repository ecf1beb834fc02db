use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::error::ConfigError;

/// Encode a string to base64. Obfuscation only, NOT encryption; the
/// config file is what actually protects the credential (0600).
pub fn encode(plain: &str) -> String {
    STANDARD.encode(plain.as_bytes())
}

/// Decode a base64 string produced by [`encode`].
pub fn decode(encoded: &str) -> Result<String, ConfigError> {
    let bytes = STANDARD
        .decode(encoded)
        .map_err(|e| ConfigError::DecodeError(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ConfigError::DecodeError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let plain = "painted-door-2024";
        assert_eq!(decode(&encode(plain)).unwrap(), plain);
    }

    #[test]
    fn invalid_base64_is_an_error() {
        assert!(decode("not base64 !!!").is_err());
    }
}
