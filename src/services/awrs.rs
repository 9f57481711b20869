// src/services/awrs.rs

use async_trait::async_trait;

use crate::{common::error::AppError, models::brand::AwrsCheckResult};

/// Verificação do número AWRS (Alcohol Wholesaler Registration Scheme).
#[async_trait]
pub trait AwrsVerifier: Send + Sync {
    async fn verify(&self, awrs_number: &str) -> Result<AwrsCheckResult, AppError>;
}

/// Só confere o formato da URN; não consulta o registro oficial.
#[derive(Debug, Clone, Default)]
pub struct FormatVerifier;

#[async_trait]
impl AwrsVerifier for FormatVerifier {
    async fn verify(&self, awrs_number: &str) -> Result<AwrsCheckResult, AppError> {
        let normalized = normalize(awrs_number);
        let format_valid = is_valid_format(&normalized);

        tracing::debug!("AWRS {} -> formato válido: {}", normalized, format_valid);

        Ok(AwrsCheckResult {
            normalized,
            format_valid,
            registry_checked: false,
        })
    }
}

/// Remove espaços e passa para maiúsculas.
pub fn normalize(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect()
}

/// XXAW + 11 dígitos, ex.: XQAW00000123456
pub fn is_valid_format(normalized: &str) -> bool {
    let bytes = normalized.as_bytes();
    bytes.len() == 15
        && bytes[..2].iter().all(u8::is_ascii_uppercase)
        && &bytes[2..4] == b"AW"
        && bytes[4..].iter().all(u8::is_ascii_digit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn accepts_well_formed_numbers_regardless_of_case_and_spacing() {
        let result = FormatVerifier.verify(" xqaw 0000 0123 456 ").await.unwrap();
        assert_eq!(result.normalized, "XQAW00000123456");
        assert!(result.format_valid);
        assert!(!result.registry_checked);
    }

    #[test]
    fn rejects_malformed_numbers() {
        for bad in ["", "XQAW0000012345", "XQAB00000123456", "1QAW00000123456", "XQAW0000012345X"] {
            assert!(!is_valid_format(&normalize(bad)), "{}", bad);
        }
    }

    #[tokio::test]
    async fn same_input_always_gives_same_answer() {
        let first = FormatVerifier.verify("XQAW00000123456").await.unwrap();
        let second = FormatVerifier.verify("XQAW00000123456").await.unwrap();
        assert_eq!(first, second);
    }
}
