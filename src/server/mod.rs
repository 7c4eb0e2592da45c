//! # Módulo Server
//!
//! Contiene el motor de concurrencia y dispatch del servidor:
//!
//! - `queue`: cola acotada que conecta el accept loop con los workers
//! - `locks`: registro de locks lectores/escritor, uno por URI
//! - `audit`: log de auditoría, una línea por request manejado
//! - `handler`: máquina de estados por conexión (parse/dispatch/respuesta)
//! - `tcp`: bind, pool de workers y accept loop

pub mod audit;
pub mod handler;
pub mod locks;
pub mod queue;
pub mod tcp;

// Re-exportamos los tipos principales
pub use tcp::Server;
