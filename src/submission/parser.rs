use bytes::Bytes;
use serde_json::{Map, Value};

/// Parse a request body into a field map based on Content-Type.
///
/// JSON is assumed when no Content-Type is sent. Any content type other than
/// JSON, urlencoded or multipart is not read and yields an empty map, as do an
/// empty body and JSON that is not an object, so the submission fails field
/// validation rather than parsing.
pub async fn parse_body(content_type: Option<&str>, body: Bytes) -> Result<Map<String, Value>, String> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Map::new());
    }

    let ct = content_type.unwrap_or("application/json");

    if ct.contains("application/json") {
        parse_json(&body)
    } else if ct.contains("application/x-www-form-urlencoded") {
        parse_form_urlencoded(&body)
    } else if ct.contains("multipart/form-data") {
        parse_multipart(ct, body).await
    } else {
        tracing::debug!("Ignoring body with unsupported content type {ct}");
        Ok(Map::new())
    }
}

fn parse_json(body: &[u8]) -> Result<Map<String, Value>, String> {
    let value: Value = serde_json::from_slice(body).map_err(|e| format!("Invalid JSON: {e}"))?;
    Ok(match value {
        Value::Object(map) => map,
        _ => Map::new(),
    })
}

fn parse_form_urlencoded(body: &[u8]) -> Result<Map<String, Value>, String> {
    let body_str = std::str::from_utf8(body).map_err(|e| format!("Invalid UTF-8: {e}"))?;

    let mut map = Map::new();
    for (k, v) in form_urlencoded::parse(body_str.as_bytes()) {
        map.insert(k.into_owned(), Value::String(v.into_owned()));
    }
    Ok(map)
}

/// Text fields of a multipart form. Unnamed parts and file uploads are skipped.
async fn parse_multipart(content_type: &str, body: Bytes) -> Result<Map<String, Value>, String> {
    let boundary = multer::parse_boundary(content_type)
        .map_err(|_| "Missing multipart boundary".to_string())?;

    let stream = futures_util::stream::once(async { Ok::<_, std::io::Error>(body) });
    let mut multipart = multer::Multipart::new(stream, boundary);

    let mut map = Map::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| format!("Multipart error: {e}"))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        if field.file_name().is_some() {
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| format!("Multipart field '{name}' unreadable: {e}"))?;
        map.insert(name, Value::String(value));
    }

    Ok(map)
}
