//! # Parsing de Requests HTTP
//! src/http/request.rs
//!
//! Este módulo implementa el parser del protocolo orientado a líneas que
//! habla el servidor de archivos.
//!
//! ## Formato de un Request
//!
//! ```text
//! GET /archivo.txt HTTP/1.1\r\n
//! Request-Id: 42\r\n
//! \r\n
//! ```
//!
//! ## Componentes
//!
//! 1. **Request Line**: `METHOD /uri HTTP/1.x`
//! 2. **Headers**: Pares `Name: Value` (uno por línea)
//! 3. **Empty Line**: `\r\n` que separa headers del body
//! 4. **Body**: solo para PUT; NO lo consume el parser, queda en el
//!    stream y lo lee `Connection::recv_file` con el Content-Length
//!
//! Un método desconocido NO es un error de parsing: se clasifica como
//! [`Method::Other`] y el handler responde `501 Not Implemented`.

use std::collections::HashMap;

/// Clasificación del método de un request
///
/// Solo GET y PUT tienen semántica propia; cualquier otro token se
/// enruta al handler de métodos no soportados.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET - Leer un archivo
    Get,

    /// PUT - Crear o sobrescribir un archivo
    Put,

    /// Cualquier otro método (DELETE, POST, ...) -> 501
    Other,
}

impl Method {
    /// Clasifica el token del método de la request line
    fn from_token(token: &str) -> Self {
        match token {
            "GET" => Method::Get,
            "PUT" => Method::Put,
            _ => Method::Other,
        }
    }
}

/// Representa un request parseado
#[derive(Debug, Clone)]
pub struct Request {
    /// Clasificación del método (GET, PUT u otro)
    method: Method,

    /// Token literal del método, tal como llegó (para el audit log)
    method_str: String,

    /// URI de la petición (ej: "/notes.txt"); es el identificador de
    /// recurso que se usa como llave del lock registry
    uri: String,

    /// Headers (ej: {"Request-Id": "42", "Content-Length": "11"})
    headers: HashMap<String, String>,

    /// Versión HTTP ("HTTP/1.0" o "HTTP/1.1")
    version: String,
}

/// Errores que pueden ocurrir durante el parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Request vacío
    EmptyRequest,

    /// Request incompleto o truncado (el stream se cerró a mitad
    /// de la cabecera)
    IncompleteRequest,

    /// Formato inválido de la request line
    InvalidRequestLine,

    /// Versión HTTP no soportada
    InvalidHttpVersion(String),

    /// Header malformado
    InvalidHeader(String),

    /// La cabecera del request supera el tamaño máximo permitido
    HeadTooLarge,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::EmptyRequest => write!(f, "Empty request"),
            ParseError::IncompleteRequest => write!(f, "Incomplete HTTP request"),
            ParseError::InvalidRequestLine => write!(f, "Invalid request line format"),
            ParseError::InvalidHttpVersion(v) => write!(f, "Unsupported HTTP version: {}", v),
            ParseError::InvalidHeader(h) => write!(f, "Invalid header: {}", h),
            ParseError::HeadTooLarge => write!(f, "Request head too large"),
        }
    }
}

impl std::error::Error for ParseError {}

impl ParseError {
    /// Retorna la respuesta pre-construida asociada a este error
    ///
    /// El handler la envía tal cual y corta la conexión: un error de
    /// protocolo nunca llega al dispatch de GET/PUT.
    ///
    /// # Ejemplo
    /// ```
    /// use file_server::http::{ParseError, StatusCode};
    ///
    /// let err = ParseError::InvalidRequestLine;
    /// assert_eq!(err.to_response().status(), StatusCode::BadRequest);
    /// ```
    pub fn to_response(&self) -> crate::http::Response {
        use crate::http::{Response, StatusCode};

        match self {
            ParseError::InvalidHttpVersion(_) => {
                Response::for_status(StatusCode::VersionNotSupported)
            }
            _ => Response::for_status(StatusCode::BadRequest),
        }
    }
}

impl Request {
    /// Parsea la cabecera de un request desde bytes
    ///
    /// El buffer debe contener la request line y los headers (hasta la
    /// línea vacía). El body de un PUT no se incluye aquí.
    ///
    /// # Retorna
    ///
    /// * `Ok(Request)` - Request parseado exitosamente
    /// * `Err(ParseError)` - Error durante el parsing
    ///
    /// # Ejemplo
    ///
    /// ```
    /// use file_server::http::{Request, Method};
    ///
    /// let raw = b"GET /notes.txt HTTP/1.1\r\n\r\n";
    /// let request = Request::parse(raw).unwrap();
    ///
    /// assert_eq!(request.method(), Method::Get);
    /// assert_eq!(request.uri(), "/notes.txt");
    /// ```
    pub fn parse(buffer: &[u8]) -> Result<Self, ParseError> {
        // Convertir a string (validando que sea UTF-8 válido)
        let request_str = std::str::from_utf8(buffer)
            .map_err(|_| ParseError::InvalidRequestLine)?;

        if request_str.trim().is_empty() {
            return Err(ParseError::EmptyRequest);
        }

        // Separar por \r\n para obtener líneas
        let lines: Vec<&str> = request_str.split("\r\n").collect();

        // 1. Parsear la request line (primera línea)
        let (method, method_str, uri, version) = Self::parse_request_line(lines[0])?;

        // 2. Parsear headers (resto de líneas hasta encontrar línea vacía)
        let headers = Self::parse_headers(&lines[1..])?;

        Ok(Request {
            method,
            method_str,
            uri,
            headers,
            version,
        })
    }

    /// Parsea la request line (primera línea del request)
    ///
    /// Formato: `GET /uri HTTP/1.1`
    fn parse_request_line(line: &str) -> Result<(Method, String, String, String), ParseError> {
        let parts: Vec<&str> = line.split_whitespace().collect();

        // Debe tener exactamente 3 partes: METHOD URI VERSION
        if parts.len() != 3 {
            return Err(ParseError::InvalidRequestLine);
        }

        // Clasificar el método; un token desconocido es válido y se
        // resuelve como 501 en el dispatch, no aquí
        let method = Method::from_token(parts[0]);

        // El URI debe ser absoluto dentro del servidor
        let uri = parts[1].to_string();
        if !uri.starts_with('/') {
            return Err(ParseError::InvalidRequestLine);
        }

        // Validar versión HTTP
        let version = parts[2].to_string();
        if version != "HTTP/1.0" && version != "HTTP/1.1" {
            return Err(ParseError::InvalidHttpVersion(version));
        }

        Ok((method, parts[0].to_string(), uri, version))
    }

    /// Parsea los headers HTTP
    ///
    /// Cada header tiene formato: "Name: Value"
    fn parse_headers(lines: &[&str]) -> Result<HashMap<String, String>, ParseError> {
        let mut headers = HashMap::new();

        for line in lines {
            // La línea vacía marca el fin de los headers
            if line.trim().is_empty() {
                break;
            }

            // Buscar el separador ':'
            if let Some(colon_pos) = line.find(':') {
                let name = line[..colon_pos].trim().to_string();
                let value = line[colon_pos + 1..].trim().to_string();
                headers.insert(name, value);
            } else {
                // Header sin ':' es inválido
                return Err(ParseError::InvalidHeader(line.to_string()));
            }
        }

        Ok(headers)
    }

    // === Métodos públicos para acceder a los campos ===

    /// Obtiene la clasificación del método del request
    pub fn method(&self) -> Method {
        self.method
    }

    /// Obtiene el token literal del método (ej: "DELETE")
    pub fn method_str(&self) -> &str {
        &self.method_str
    }

    /// Obtiene el URI del request (identificador de recurso)
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Obtiene todos los headers
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Obtiene un header específico
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(|s| s.as_str())
    }

    /// Obtiene el Content-Length declarado, si existe y es numérico
    pub fn content_length(&self) -> Option<u64> {
        self.header("Content-Length")
            .and_then(|v| v.parse().ok())
    }

    /// Obtiene la versión HTTP
    pub fn version(&self) -> &str {
        &self.version
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::StatusCode;

    #[test]
    fn test_parse_simple_get() {
        let raw = b"GET /notes.txt HTTP/1.1\r\n\r\n";
        let request = Request::parse(raw).unwrap();

        assert_eq!(request.method(), Method::Get);
        assert_eq!(request.method_str(), "GET");
        assert_eq!(request.uri(), "/notes.txt");
        assert!(request.headers().is_empty());
    }

    #[test]
    fn test_parse_put_with_content_length() {
        let raw = b"PUT /data.bin HTTP/1.1\r\nContent-Length: 11\r\n\r\n";
        let request = Request::parse(raw).unwrap();

        assert_eq!(request.method(), Method::Put);
        assert_eq!(request.uri(), "/data.bin");
        assert_eq!(request.content_length(), Some(11));
    }

    #[test]
    fn test_parse_http_1_0_accepted() {
        let raw = b"GET /a HTTP/1.0\r\n\r\n";
        let request = Request::parse(raw).unwrap();
        assert_eq!(request.version(), "HTTP/1.0");
    }

    #[test]
    fn test_unknown_method_is_not_a_parse_error() {
        // DELETE debe parsear bien y clasificarse como Other;
        // la respuesta 501 la decide el handler, no el parser
        let raw = b"DELETE /notes.txt HTTP/1.1\r\n\r\n";
        let request = Request::parse(raw).unwrap();

        assert_eq!(request.method(), Method::Other);
        assert_eq!(request.method_str(), "DELETE");
    }

    #[test]
    fn test_parse_with_headers() {
        let raw = b"GET /a HTTP/1.1\r\nHost: localhost:8080\r\nRequest-Id: 42\r\n\r\n";
        let request = Request::parse(raw).unwrap();

        assert_eq!(request.header("Host"), Some("localhost:8080"));
        assert_eq!(request.header("Request-Id"), Some("42"));
    }

    #[test]
    fn test_content_length_non_numeric() {
        let raw = b"PUT /a HTTP/1.1\r\nContent-Length: abc\r\n\r\n";
        let request = Request::parse(raw).unwrap();
        assert_eq!(request.content_length(), None);
    }

    #[test]
    fn test_invalid_version() {
        let raw = b"GET /a HTTP/2.0\r\n\r\n";
        let result = Request::parse(raw);

        assert!(matches!(result, Err(ParseError::InvalidHttpVersion(_))));
    }

    #[test]
    fn test_empty_request() {
        let raw = b"";
        let result = Request::parse(raw);

        assert!(matches!(result, Err(ParseError::EmptyRequest)));
    }

    #[test]
    fn test_invalid_request_line() {
        let raw = b"GET\r\n\r\n"; // Falta URI y version
        let result = Request::parse(raw);

        assert!(matches!(result, Err(ParseError::InvalidRequestLine)));
    }

    #[test]
    fn test_uri_must_start_with_slash() {
        let raw = b"GET notes.txt HTTP/1.1\r\n\r\n";
        let result = Request::parse(raw);

        assert!(matches!(result, Err(ParseError::InvalidRequestLine)));
    }

    #[test]
    fn test_invalid_header() {
        let raw = b"GET /a HTTP/1.1\r\nsin-dos-puntos\r\n\r\n";
        let result = Request::parse(raw);

        assert!(matches!(result, Err(ParseError::InvalidHeader(_))));
    }

    #[test]
    fn test_error_responses() {
        assert_eq!(
            ParseError::InvalidRequestLine.to_response().status(),
            StatusCode::BadRequest
        );
        assert_eq!(
            ParseError::InvalidHttpVersion("HTTP/2.0".to_string()).to_response().status(),
            StatusCode::VersionNotSupported
        );
        assert_eq!(
            ParseError::HeadTooLarge.to_response().status(),
            StatusCode::BadRequest
        );
    }
}
