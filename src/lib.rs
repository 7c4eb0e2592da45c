//! # File Server
//! src/lib.rs
//!
//! Servidor de archivos GET/PUT concurrente implementado desde cero para
//! demostrar conceptos de sistemas operativos: concurrencia,
//! sincronización por recurso y manejo de recursos.
//!
//! ## Arquitectura
//!
//! El servidor está dividido en módulos especializados:
//! - `http`: parsing de requests, construcción de responses y el wrapper
//!   de conexión con streaming de archivos
//! - `server`: cola de conexiones, registro de locks por recurso, pool
//!   de workers, handler por conexión y audit log
//! - `config`: configuración por CLI y variables de entorno
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use file_server::config::Config;
//! use file_server::server::Server;
//!
//! let config = Config::default();
//! let server = Server::bind(config).expect("Error al iniciar servidor");
//! server.run().expect("Error fatal");
//! ```

pub mod config;
pub mod http;
pub mod server;
