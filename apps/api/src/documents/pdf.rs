use super::DocumentError;

pub fn extract_pdf_text(data: &[u8]) -> Result<String, DocumentError> {
    pdf_extract::extract_text_from_mem(data).map_err(|e| DocumentError::Pdf(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_garbage_bytes_are_rejected() {
        let err = extract_pdf_text(b"definitely not a pdf").unwrap_err();
        assert!(matches!(err, DocumentError::Pdf(_)));
    }
}
