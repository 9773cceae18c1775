use bytes::Bytes;

use crate::errors::AppError;

/// Extracts plain text from an uploaded PDF.
///
/// `pdf-extract` is CPU-bound and can panic on malformed input, so it runs on the
/// blocking pool; both errors and panics surface as `UnprocessableEntity`.
pub async fn extract_pdf_text(file_name: &str, bytes: Bytes) -> Result<String, AppError> {
    let outcome = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
        .await;

    match outcome {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(AppError::UnprocessableEntity(format!(
            "could not read PDF '{file_name}': {e}"
        ))),
        Err(e) if e.is_panic() => Err(AppError::UnprocessableEntity(format!(
            "could not read PDF '{file_name}': extractor rejected the document"
        ))),
        Err(e) => Err(AppError::Internal(anyhow::anyhow!(
            "spawn_blocking failed in PDF extraction: {e}"
        ))),
    }
}

/// Candidate name for an uploaded file: the file name without its last extension.
pub fn candidate_name_from_file(file_name: &str) -> String {
    let base = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(file_name);
    match base.rfind('.') {
        Some(idx) if idx > 0 => base[..idx].to_string(),
        _ => base.to_string(),
    }
}
