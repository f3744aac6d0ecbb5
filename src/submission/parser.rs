use std::collections::HashMap;

use axum::http::HeaderMap;

pub type FormFields = HashMap<String, String>;

/// Decode a form body based on its Content-Type. Browsers posting `FormData`
/// send multipart; plain HTML forms send urlencoded.
pub async fn parse_form(headers: &HeaderMap, body: bytes::Bytes) -> Result<FormFields, String> {
    let content_type = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/x-www-form-urlencoded");
    // MIME types are case-insensitive; the boundary parameter is not.
    let mime = content_type.to_ascii_lowercase();

    if mime.contains("multipart/form-data") {
        parse_multipart(content_type, body).await
    } else if mime.contains("application/x-www-form-urlencoded") {
        parse_form_urlencoded(&body)
    } else {
        Err(format!("Unsupported content type: {content_type}"))
    }
}

pub fn parse_form_urlencoded(body: &[u8]) -> Result<FormFields, String> {
    std::str::from_utf8(body).map_err(|e| format!("Invalid UTF-8: {e}"))?;
    // Last occurrence wins for repeated keys.
    let map = form_urlencoded::parse(body)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    Ok(map)
}

async fn parse_multipart(content_type: &str, body: bytes::Bytes) -> Result<FormFields, String> {
    let boundary =
        multer::parse_boundary(content_type).map_err(|_| "Missing multipart boundary".to_string())?;

    let stream = futures_util::stream::once(async { Ok::<_, std::io::Error>(body) });
    let mut multipart = multer::Multipart::new(stream, boundary);

    let mut map = FormFields::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| format!("Multipart error: {e}"))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        let value = field
            .text()
            .await
            .map_err(|e| format!("Field read error: {e}"))?;
        map.insert(name, value);
    }

    Ok(map)
}
