//! # Conexión de Cliente
//! src/http/connection.rs
//!
//! Envuelve el `TcpStream` de una conexión aceptada junto con su estado
//! de parsing. Una `Connection` pertenece exclusivamente al worker que
//! la procesa: se crea al desencolar, se destruye (y el socket se
//! cierra) cuando el handler termina, con éxito o con error.
//!
//! También implementa los helpers de transferencia de archivos:
//! - [`Connection::send_file`]: streaming de N bytes de un archivo
//!   abierto hacia el cliente
//! - [`Connection::recv_file`]: streaming del body del request hacia un
//!   archivo abierto

use crate::http::{ParseError, Request, Response, StatusCode};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::net::TcpStream;

/// Tamaño máximo de la cabecera de un request (request line + headers)
const MAX_HEAD_SIZE: usize = 8192;

/// Una conexión aceptada, con buffering de lectura y el request parseado
pub struct Connection {
    /// Stream buffereado; las escrituras van por `reader.get_mut()`
    reader: BufReader<TcpStream>,

    /// Request parseado de esta conexión (si el parsing tuvo éxito)
    request: Option<Request>,
}

impl Connection {
    /// Crea una conexión a partir de un stream aceptado
    pub fn new(stream: TcpStream) -> Self {
        Self {
            reader: BufReader::new(stream),
            request: None,
        }
    }

    /// Lee y parsea exactamente un request de la conexión
    ///
    /// Consume del stream la request line y los headers (hasta la línea
    /// vacía inclusive). El body de un PUT queda sin consumir para que
    /// lo lea [`Connection::recv_file`].
    ///
    /// # Retorna
    ///
    /// * `Ok(&Request)` - Request parseado; queda guardado en la conexión
    /// * `Err(ParseError)` - Error de protocolo; el llamador envía
    ///   `err.to_response()` y termina la conexión
    pub fn parse_request(&mut self) -> Result<&Request, ParseError> {
        let mut head = Vec::new();

        loop {
            let mut line = Vec::new();
            let n = self
                .reader
                .read_until(b'\n', &mut line)
                .map_err(|_| ParseError::IncompleteRequest)?;

            if n == 0 {
                // EOF antes de la línea vacía
                if head.is_empty() {
                    return Err(ParseError::EmptyRequest);
                }
                return Err(ParseError::IncompleteRequest);
            }

            head.extend_from_slice(&line);

            if head.len() > MAX_HEAD_SIZE {
                return Err(ParseError::HeadTooLarge);
            }

            // La línea vacía marca el fin de la cabecera
            if line == b"\r\n" || line == b"\n" {
                break;
            }
        }

        let request = Request::parse(&head)?;
        Ok(self.request.insert(request))
    }

    /// Obtiene el request parseado, si lo hay
    pub fn request(&self) -> Option<&Request> {
        self.request.as_ref()
    }

    /// Envía una respuesta completa (status line, headers y body)
    pub fn send_response(&mut self, response: &Response) -> io::Result<()> {
        let stream = self.reader.get_mut();
        stream.write_all(&response.to_bytes())?;
        stream.flush()
    }

    /// Envía la cabecera de respuesta y luego `len` bytes del archivo
    ///
    /// Se usa en el camino exitoso de GET: el body es el contenido del
    /// archivo, transmitido por streaming sin cargarlo entero en memoria.
    pub fn send_file(&mut self, status: StatusCode, file: &mut File, len: u64) -> io::Result<()> {
        let stream = self.reader.get_mut();

        let head = format!("HTTP/1.0 {}\r\nContent-Length: {}\r\n\r\n", status, len);
        stream.write_all(head.as_bytes())?;

        let copied = io::copy(&mut file.take(len), stream)?;
        if copied != len {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "file truncated while sending",
            ));
        }

        stream.flush()
    }

    /// Recibe el body del request y lo escribe en el archivo
    ///
    /// Si el request declara `Content-Length`, lee exactamente esa
    /// cantidad de bytes; si no, lee hasta EOF (framing HTTP/1.0).
    /// Retorna la cantidad de bytes escritos.
    pub fn recv_file(&mut self, file: &mut File) -> io::Result<u64> {
        let content_length = self.request.as_ref().and_then(|r| r.content_length());

        match content_length {
            Some(len) => {
                let copied = io::copy(&mut (&mut self.reader).take(len), file)?;
                if copied != len {
                    return Err(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "request body shorter than Content-Length",
                    ));
                }
                Ok(copied)
            }
            None => io::copy(&mut self.reader, file),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::Method;
    use std::io::{Seek, SeekFrom};
    use std::net::TcpListener;
    use std::thread;

    /// Helper: crea un par (cliente, conexión aceptada) sobre un puerto efímero
    fn connected_pair() -> (TcpStream, Connection) {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = listener.local_addr().unwrap();

        let client = TcpStream::connect(addr).unwrap();
        let (accepted, _) = listener.accept().unwrap();

        (client, Connection::new(accepted))
    }

    #[test]
    fn test_parse_request_over_socket() {
        let (mut client, mut conn) = connected_pair();

        client
            .write_all(b"GET /hello.txt HTTP/1.1\r\nRequest-Id: 7\r\n\r\n")
            .unwrap();

        let request = conn.parse_request().unwrap();
        assert_eq!(request.method(), Method::Get);
        assert_eq!(request.uri(), "/hello.txt");
        assert_eq!(request.header("Request-Id"), Some("7"));
    }

    #[test]
    fn test_parse_request_empty_connection() {
        let (client, mut conn) = connected_pair();

        // Cliente cierra sin enviar nada
        drop(client);

        let result = conn.parse_request();
        assert!(matches!(result, Err(ParseError::EmptyRequest)));
    }

    #[test]
    fn test_parse_request_truncated_head() {
        let (mut client, mut conn) = connected_pair();

        client.write_all(b"GET /hello.txt HTTP/1.1\r\nRequest").unwrap();
        drop(client);

        let result = conn.parse_request();
        assert!(matches!(result, Err(ParseError::IncompleteRequest)));
    }

    #[test]
    fn test_parse_request_head_too_large() {
        let (mut client, mut conn) = connected_pair();

        let big_header = format!("GET /a HTTP/1.1\r\nX-Junk: {}\r\n\r\n", "x".repeat(MAX_HEAD_SIZE));
        let t = thread::spawn(move || {
            // Puede fallar a mitad de escritura si el server corta antes
            let _ = client.write_all(big_header.as_bytes());
        });

        let result = conn.parse_request();
        assert!(matches!(result, Err(ParseError::HeadTooLarge)));
        t.join().unwrap();
    }

    #[test]
    fn test_send_response_roundtrip() {
        let (mut client, mut conn) = connected_pair();

        let response = Response::for_status(StatusCode::NotFound);
        conn.send_response(&response).unwrap();
        drop(conn);

        let mut buf = String::new();
        client.read_to_string(&mut buf).unwrap();

        assert!(buf.starts_with("HTTP/1.0 404 Not Found\r\n"));
        assert!(buf.ends_with("Not Found\n"));
    }

    #[test]
    fn test_send_file_streams_exact_length() {
        let (mut client, mut conn) = connected_pair();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        std::fs::write(&path, b"contenido de prueba").unwrap();

        let mut file = File::open(&path).unwrap();
        let len = file.metadata().unwrap().len();
        conn.send_file(StatusCode::Ok, &mut file, len).unwrap();
        drop(conn);

        let mut buf = String::new();
        client.read_to_string(&mut buf).unwrap();

        assert!(buf.starts_with("HTTP/1.0 200 OK\r\n"));
        assert!(buf.contains(&format!("Content-Length: {}\r\n", len)));
        assert!(buf.ends_with("contenido de prueba"));
    }

    #[test]
    fn test_recv_file_with_content_length() {
        let (mut client, mut conn) = connected_pair();

        client
            .write_all(b"PUT /up.bin HTTP/1.1\r\nContent-Length: 5\r\n\r\nhola!extra")
            .unwrap();

        conn.parse_request().unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("up.bin");
        let mut file = File::create(&path).unwrap();

        let written = conn.recv_file(&mut file).unwrap();
        assert_eq!(written, 5);

        // Solo los 5 bytes declarados, sin el sobrante del stream
        assert_eq!(std::fs::read(&path).unwrap(), b"hola!");
    }

    #[test]
    fn test_recv_file_without_content_length_reads_to_eof() {
        let (mut client, mut conn) = connected_pair();

        client.write_all(b"PUT /up.bin HTTP/1.1\r\n\r\nbody hasta eof").unwrap();
        drop(client);

        conn.parse_request().unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("up.bin");
        let mut file = File::create(&path).unwrap();

        conn.recv_file(&mut file).unwrap();
        file.seek(SeekFrom::Start(0)).unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"body hasta eof");
    }

    #[test]
    fn test_recv_file_body_shorter_than_declared() {
        let (mut client, mut conn) = connected_pair();

        client
            .write_all(b"PUT /up.bin HTTP/1.1\r\nContent-Length: 100\r\n\r\ncorto")
            .unwrap();
        drop(client);

        conn.parse_request().unwrap();

        let dir = tempfile::tempdir().unwrap();
        let mut file = File::create(dir.path().join("up.bin")).unwrap();

        let result = conn.recv_file(&mut file);
        assert!(result.is_err());
        assert_eq!(result.unwrap_err().kind(), io::ErrorKind::UnexpectedEof);
    }
}
