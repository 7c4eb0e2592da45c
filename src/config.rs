//! # Configuración del Servidor
//! src/config.rs
//!
//! Este módulo define la configuración del servidor de archivos con
//! soporte para argumentos CLI y variables de entorno.
//!
//! ## Ejemplos de uso
//!
//! ### CLI
//! ```bash
//! ./file_server --port 8080 --threads 4 --root ./data
//! ```
//!
//! ### Variables de entorno
//! ```bash
//! FILE_SERVER_PORT=8080 FILE_SERVER_THREADS=8 ./file_server
//! ```

use clap::Parser;

/// Configuración del servidor de archivos GET/PUT
#[derive(Debug, Clone, Parser)]
#[command(name = "file_server")]
#[command(about = "Servidor de archivos GET/PUT concurrente para Principios de Sistemas Operativos")]
#[command(version = "0.1.0")]
pub struct Config {
    /// Puerto en el que escucha el servidor
    #[arg(short, long, default_value = "8080", env = "FILE_SERVER_PORT")]
    pub port: u16,

    /// Host/IP en el que escucha
    #[arg(long, default_value = "127.0.0.1", env = "FILE_SERVER_HOST")]
    pub host: String,

    /// Número de worker threads del pool (fijo durante toda la vida
    /// del proceso; la cola de conexiones se dimensiona a este valor)
    #[arg(short, long, default_value = "4", env = "FILE_SERVER_THREADS")]
    pub threads: usize,

    /// Directorio raíz desde el que se sirven y escriben archivos
    #[arg(long, default_value = ".", env = "FILE_SERVER_ROOT")]
    pub root: String,
}

impl Config {
    /// Crea una nueva configuración parseando argumentos CLI
    ///
    /// # Ejemplo
    /// ```no_run
    /// use file_server::config::Config;
    ///
    /// let config = Config::new();
    /// println!("Server listening on {}", config.address());
    /// ```
    pub fn new() -> Self {
        Config::parse()
    }

    /// Obtiene la dirección completa para bind (host:port)
    ///
    /// # Ejemplo
    /// ```
    /// use file_server::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.address(), "127.0.0.1:8080");
    /// ```
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Valida la configuración
    ///
    /// Retorna errores si hay valores inválidos. Un pool de 0 workers
    /// se rechaza acá en vez de degradar silenciosamente.
    pub fn validate(&self) -> Result<(), String> {
        if self.threads == 0 {
            return Err("Worker threads must be >= 1".to_string());
        }

        if self.root.is_empty() {
            return Err("Root directory must not be empty".to_string());
        }

        Ok(())
    }

    /// Imprime un resumen de la configuración
    pub fn print_summary(&self) {
        println!("╔══════════════════════════════════════════╗");
        println!("║   GET/PUT File Server Configuration      ║");
        println!("╚══════════════════════════════════════════╝");
        println!();
        println!("🌐 Network:");
        println!("   Address:   {}", self.address());
        println!("   Root dir:  {}", self.root);
        println!();
        println!("👷 Workers:");
        println!("   Threads:   {}", self.threads);
        println!("   Queue cap: {}", self.threads);
        println!();
        println!("═══════════════════════════════════════════");
        println!();
    }
}

impl Default for Config {
    /// Configuración por defecto
    fn default() -> Self {
        Self {
            port: 8080,
            host: "127.0.0.1".to_string(),
            threads: 4,
            root: ".".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.threads, 4);
        assert_eq!(config.root, ".");
    }

    #[test]
    fn test_address() {
        let config = Config::default();
        assert_eq!(config.address(), "127.0.0.1:8080");
    }

    #[test]
    fn test_address_custom() {
        let mut config = Config::default();
        config.host = "0.0.0.0".to_string();
        config.port = 3000;
        assert_eq!(config.address(), "0.0.0.0:3000");
    }

    #[test]
    fn test_validate_success() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_zero_threads_rejected() {
        let mut config = Config::default();
        config.threads = 0;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Worker threads"));
    }

    #[test]
    fn test_validate_empty_root_rejected() {
        let mut config = Config::default();
        config.root = String::new();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Root directory"));
    }

    #[test]
    fn test_config_custom_values() {
        let mut config = Config::default();
        config.port = 3000;
        config.threads = 8;
        config.root = "/srv/files".to_string();

        assert_eq!(config.port, 3000);
        assert_eq!(config.threads, 8);
        assert_eq!(config.root, "/srv/files");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_print_summary() {
        let config = Config::default();
        // Should not panic
        config.print_summary();
    }
}
