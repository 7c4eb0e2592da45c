//! # Handler de Conexiones
//! src/server/handler.rs
//!
//! Máquina de estados por conexión:
//!
//! ```text
//! PARSING -> DISPATCHING -> {GET | PUT | UNSUPPORTED} -> RESPONDING -> DONE
//! ```
//!
//! Cada worker ejecuta este handler de principio a fin sobre una
//! conexión desencolada. Todos los caminos de salida (éxito, cada rama
//! de error, y el corte por fallo de parsing) envían exactamente una
//! respuesta del conjunto cerrado de status codes y escriben exactamente
//! una línea de audit log. Ningún error escapa del handler: un fallo
//! nunca tumba al worker ni al proceso.
//!
//! ## Disciplina de locking
//!
//! - GET adquiere el lock del URI en modo compartido antes de abrir el
//!   archivo y lo suelta después de enviar la respuesta completa
//! - PUT adquiere el lock en modo exclusivo durante toda la secuencia
//!   open/truncate/write y el envío de la respuesta
//! - Un método no soportado no toca ni el filesystem ni el registro
//!
//! Los descriptores de archivo se cierran en todos los caminos por RAII,
//! incluidas las ramas de error.

use crate::http::{Connection, Method, Response, StatusCode};
use crate::server::audit::{AuditLog, DEFAULT_REQUEST_ID, UNAVAILABLE_URI, UNKNOWN_METHOD};
use crate::server::locks::LockRegistry;
use std::fs::{File, OpenOptions};
use std::io;
use std::net::TcpStream;
use std::path::PathBuf;

/// Contexto compartido que cada worker usa para manejar conexiones
pub struct Handler {
    /// Registro de locks por recurso, compartido entre workers
    registry: LockRegistry,

    /// Audit log del proceso
    audit: AuditLog,

    /// Directorio raíz contra el que se resuelven los URIs
    root: PathBuf,
}

impl Handler {
    /// Crea un handler con sus colaboradores
    pub fn new(registry: LockRegistry, audit: AuditLog, root: PathBuf) -> Self {
        Self {
            registry,
            audit,
            root,
        }
    }

    /// Maneja una conexión completa: parse, dispatch, respuesta y audit
    ///
    /// Al retornar, la conexión (y el socket subyacente) se destruye,
    /// haya terminado bien o mal.
    pub fn handle_connection(&self, stream: TcpStream) {
        let mut conn = Connection::new(stream);

        let method = match conn.parse_request() {
            Ok(request) => request.method(),
            Err(err) => {
                // Corte por error de protocolo: el parser ya decidió la
                // respuesta; se envía, se audita y no hay dispatch
                let response = err.to_response();
                let _ = conn.send_response(&response);
                self.audit.record(
                    UNKNOWN_METHOD,
                    UNAVAILABLE_URI,
                    response.status(),
                    DEFAULT_REQUEST_ID,
                );
                return;
            }
        };

        match method {
            Method::Get => self.handle_get(&mut conn),
            Method::Put => self.handle_put(&mut conn),
            Method::Other => self.handle_unsupported(&mut conn),
        }
    }

    /// GET: leer un archivo bajo lock compartido
    fn handle_get(&self, conn: &mut Connection) {
        let uri = self.request_uri(conn);

        let lock = self.registry.acquire(&uri);
        let _guard = lock.read().unwrap();

        let status = match File::open(self.resolve(&uri)) {
            Err(err) => {
                let status = triage_open_error(&err);
                let _ = conn.send_response(&Response::for_status(status));
                status
            }
            Ok(mut file) => match file.metadata() {
                Ok(meta) if meta.is_dir() => {
                    // Leer el contenido de un directorio nunca se permite
                    let status = StatusCode::Forbidden;
                    let _ = conn.send_response(&Response::for_status(status));
                    status
                }
                Ok(meta) => match conn.send_file(StatusCode::Ok, &mut file, meta.len()) {
                    Ok(()) => StatusCode::Ok,
                    // La respuesta ya salió (posiblemente parcial);
                    // solo queda registrar el fallo
                    Err(_) => StatusCode::InternalServerError,
                },
                Err(_) => {
                    let status = StatusCode::InternalServerError;
                    let _ = conn.send_response(&Response::for_status(status));
                    status
                }
            },
        };

        self.audit_request(conn, status);
        // _guard se suelta aquí, después de enviar la respuesta completa
    }

    /// PUT: crear o sobrescribir un archivo bajo lock exclusivo
    fn handle_put(&self, conn: &mut Connection) {
        let uri = self.request_uri(conn);

        let lock = self.registry.acquire(&uri);
        let _guard = lock.write().unwrap();

        let path = self.resolve(&uri);

        // Recordar si ya existía para distinguir 200 de 201
        let existed = path.exists();

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            // Permisos de lectura/escritura solo para el dueño
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let status = match options.open(&path) {
            Err(err) => triage_open_error(&err),
            Ok(mut file) => match conn.recv_file(&mut file) {
                Ok(_) => {
                    if existed {
                        StatusCode::Ok
                    } else {
                        StatusCode::Created
                    }
                }
                Err(_) => StatusCode::InternalServerError,
            },
        };

        let _ = conn.send_response(&Response::for_status(status));
        self.audit_request(conn, status);
    }

    /// Cualquier método distinto de GET/PUT: 501, sin tocar archivos ni locks
    fn handle_unsupported(&self, conn: &mut Connection) {
        let status = StatusCode::NotImplemented;
        let _ = conn.send_response(&Response::for_status(status));
        self.audit_request(conn, status);
    }

    /// Resuelve un URI contra el directorio raíz servido
    fn resolve(&self, uri: &str) -> PathBuf {
        self.root.join(uri.trim_start_matches('/'))
    }

    /// URI del request ya parseado de esta conexión
    fn request_uri(&self, conn: &Connection) -> String {
        conn.request()
            .map(|r| r.uri().to_string())
            .unwrap_or_else(|| UNAVAILABLE_URI.to_string())
    }

    /// Escribe la línea de audit de esta conexión
    fn audit_request(&self, conn: &Connection, status: StatusCode) {
        match conn.request() {
            Some(request) => {
                let request_id = request.header("Request-Id").unwrap_or(DEFAULT_REQUEST_ID);
                self.audit
                    .record(request.method_str(), request.uri(), status, request_id);
            }
            None => {
                self.audit
                    .record(UNKNOWN_METHOD, UNAVAILABLE_URI, status, DEFAULT_REQUEST_ID);
            }
        }
    }
}

impl Clone for Handler {
    fn clone(&self) -> Self {
        Self {
            registry: self.registry.clone(),
            audit: self.audit.clone(),
            root: self.root.clone(),
        }
    }
}

/// Mapea un fallo de `open` al status code correspondiente
///
/// - Sin permisos, o el destino es un directorio -> 403
/// - No existe -> 404
/// - Cualquier otro error del SO -> 500
fn triage_open_error(err: &io::Error) -> StatusCode {
    match err.kind() {
        io::ErrorKind::PermissionDenied => StatusCode::Forbidden,
        io::ErrorKind::IsADirectory => StatusCode::Forbidden,
        io::ErrorKind::NotFound => StatusCode::NotFound,
        _ => StatusCode::InternalServerError,
    }
}
