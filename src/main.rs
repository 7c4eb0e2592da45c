//! # File Server - Entry Point
//! src/main.rs
//!
//! Punto de entrada del servidor de archivos GET/PUT.

use file_server::config::Config;
use file_server::server::Server;

fn main() {
    println!("=================================");
    println!("  GET/PUT File Server");
    println!("  Principios de Sistemas Operativos");
    println!("=================================\n");

    // Parsear configuración (CLI y variables de entorno)
    let config = Config::new();

    if let Err(e) = config.validate() {
        eprintln!("💥 Configuracion invalida: {}", e);
        std::process::exit(1);
    }

    config.print_summary();

    // Bind + pool de workers + accept loop (bloquea para siempre)
    let result = Server::bind(config).and_then(|server| server.run());

    if let Err(e) = result {
        eprintln!("💥 Error fatal: {}", e);
        std::process::exit(1);
    }
}
