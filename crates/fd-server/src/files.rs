use actix_web::HttpRequest;
use actix_web::HttpResponse;
use actix_web::http::Method;
use actix_web::http::header;
use actix_web::web;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

const FILE_NOT_FOUND: &str = "We are sorry, the file you requested cannot be found.";
const PATH_ESCAPE: &str = "The file you requested is outside server scope.";
const INDEX: &str = "index.html";

/// Canonical root of the static frontend.
#[derive(Debug, Clone)]
pub struct DocumentRoot(pub PathBuf);

/// Serves everything outside `/api/`: decoded request path resolved under
/// the document root, with directories falling back to `index.html`.
pub async fn serve(root: web::Data<DocumentRoot>, req: HttpRequest) -> HttpResponse {
    if req.method() != Method::GET && req.method() != Method::HEAD {
        return HttpResponse::MethodNotAllowed()
            .insert_header((header::ALLOW, "GET, HEAD"))
            .content_type("text/plain")
            .body("Invalid method");
    }
    let Some(decoded) = decode(req.path()) else {
        return escape_response();
    };
    let Some(mut target) = resolve(&root.0, &decoded) else {
        return escape_response();
    };
    if target.is_dir() {
        target.push(INDEX);
    }
    match tokio::fs::read(&target).await {
        Ok(content) => HttpResponse::Ok()
            .content_type(mime_of(&target))
            .body(content),
        Err(_) => HttpResponse::NotFound()
            .content_type("text/plain")
            .body(FILE_NOT_FOUND),
    }
}

fn escape_response() -> HttpResponse {
    HttpResponse::BadRequest()
        .content_type("text/plain")
        .body(PATH_ESCAPE)
}

/// Percent-decodes a request path; `+` decodes to a space.
fn decode(path: &str) -> Option<String> {
    let plus_as_space = path.replace('+', " ");
    percent_encoding::percent_decode_str(&plus_as_space)
        .decode_utf8()
        .ok()
        .map(|decoded| decoded.into_owned())
}

/// Resolves a decoded request path under the root. Normalizes `.` and `..`
/// lexically; any attempt to climb above the root resolves to `None`.
fn resolve(root: &Path, decoded: &str) -> Option<PathBuf> {
    let mut target = root.to_path_buf();
    let mut depth = 0usize;
    for component in Path::new(decoded.trim_start_matches('/')).components() {
        match component {
            Component::Normal(segment) => {
                target.push(segment);
                depth += 1;
            }
            Component::CurDir => {}
            Component::ParentDir => {
                if depth == 0 {
                    return None;
                }
                target.pop();
                depth -= 1;
            }
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(target)
}

/// MIME type by extension, octet-stream as the default.
fn mime_of(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "htm" | "html" => "text/html",
        "css" => "text/css",
        "txt" => "text/plain",
        "js" => "text/javascript",
        "json" => "application/json",
        "xml" => "application/xml",
        "png" => "image/png",
        "jpg" | "jpe" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "ico" => "image/vnd.microsoft.icon",
        "tif" | "tiff" => "image/tiff",
        "svg" | "svgz" => "image/svg+xml",
        "mp3" => "audio/mpeg",
        _ => "application/octet-stream",
    }
}
