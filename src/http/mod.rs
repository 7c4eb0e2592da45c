//! # Módulo HTTP
//!
//! Este módulo implementa el protocolo orientado a líneas que hablan los
//! clientes del servidor de archivos, sin usar librerías de alto nivel.
//! Incluye:
//!
//! - Parsing de la cabecera de un request (método, URI, headers)
//! - Construcción de responses con su status line
//! - Manejo de status codes
//! - El wrapper de conexión con los helpers de streaming de archivos
//!
//! ### Formato de Request
//!
//! ```text
//! PUT /archivo.txt HTTP/1.1\r\n
//! Content-Length: 11\r\n
//! Request-Id: 42\r\n
//! \r\n
//! hola mundo\n
//! ```
//!
//! ### Formato de Response
//!
//! ```text
//! HTTP/1.0 201 Created\r\n
//! Content-Length: 8\r\n
//! \r\n
//! Created\n
//! ```

pub mod connection; // Wrapper de conexión + streaming de archivos
pub mod request;    // Parsing de requests
pub mod response;   // Construcción de responses
pub mod status;     // Códigos de estado HTTP

// Re-exportamos los tipos principales para facilitar su uso
// Esto permite usar `http::Request` en vez de `http::request::Request`
pub use connection::Connection;
pub use request::{Method, ParseError, Request};
pub use response::Response;
pub use status::StatusCode;
