//! # Audit Log
//! src/server/audit.rs
//!
//! Registro post-hoc de cada conexión manejada, una línea por request:
//!
//! ```text
//! METHOD, URI, STATUS, REQUEST-ID
//! ```
//!
//! Se escribe una línea exactamente una vez por conexión, en todos los
//! caminos de salida del handler: éxito, error de filesystem y también
//! requests que ni siquiera parsearon. El sink por defecto es stderr.

use crate::http::StatusCode;
use std::io::Write;
use std::sync::{Arc, Mutex};

/// Etiqueta de método cuando el request no se pudo parsear
pub const UNKNOWN_METHOD: &str = "UNKNOWN";

/// Marcador de URI cuando el request no se pudo parsear
pub const UNAVAILABLE_URI: &str = "-";

/// Request-Id por defecto cuando el cliente no manda el header
pub const DEFAULT_REQUEST_ID: &str = "0";

/// Log de auditoría thread-safe con sink configurable
pub struct AuditLog {
    sink: Arc<Mutex<Box<dyn Write + Send>>>,
}

/// Sink que acumula las líneas en un buffer compartido (para pruebas)
struct BufferSink(Arc<Mutex<Vec<u8>>>);

impl Write for BufferSink {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl AuditLog {
    /// Crea un audit log que escribe a stderr (el sink del proceso)
    pub fn stderr() -> Self {
        Self::with_sink(Box::new(std::io::stderr()))
    }

    /// Crea un audit log con un sink arbitrario
    pub fn with_sink(sink: Box<dyn Write + Send>) -> Self {
        Self {
            sink: Arc::new(Mutex::new(sink)),
        }
    }

    /// Crea un audit log que acumula en memoria, junto con el buffer
    /// compartido para leer lo escrito (usado en las pruebas)
    pub fn to_buffer() -> (Self, Arc<Mutex<Vec<u8>>>) {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        let log = Self::with_sink(Box::new(BufferSink(Arc::clone(&buffer))));
        (log, buffer)
    }

    /// Registra una conexión manejada
    ///
    /// Un fallo de escritura en el sink se ignora: el audit log nunca
    /// tumba a un worker.
    pub fn record(&self, method: &str, uri: &str, status: StatusCode, request_id: &str) {
        let mut sink = self.sink.lock().unwrap();
        let _ = writeln!(sink, "{}, {}, {}, {}", method, uri, status.as_u16(), request_id);
        let _ = sink.flush();
    }
}

impl Clone for AuditLog {
    fn clone(&self) -> Self {
        Self {
            sink: Arc::clone(&self.sink),
        }
    }
}
