//! # Servidor TCP Concurrente
//! src/server/tcp.rs
//!
//! Implementación del servidor TCP con un pool fijo de worker threads.
//! El accept loop es el único productor: cada conexión aceptada se
//! empuja a la cola acotada, y cada worker repite desencolar -> manejar
//! la conexión completa -> cerrar el socket -> volver a desencolar.
//!
//! Un worker nunca procesa más de una conexión a la vez. Los workers
//! comparten únicamente la cola, el registro de locks, el audit log y el
//! filesystem; viven hasta que el proceso muere (no hay shutdown
//! ordenado).

use crate::config::Config;
use crate::server::audit::AuditLog;
use crate::server::handler::Handler;
use crate::server::locks::LockRegistry;
use crate::server::queue::ConnectionQueue;
use std::io;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::path::PathBuf;
use std::thread;

/// Servidor de archivos GET/PUT concurrente
pub struct Server {
    config: Config,
    listener: TcpListener,
    queue: ConnectionQueue<TcpStream>,
    handler: Handler,
}

impl Server {
    /// Crea el servidor y hace bind a la dirección configurada
    ///
    /// El audit log va a stderr, una línea por request.
    pub fn bind(config: Config) -> io::Result<Self> {
        let audit = AuditLog::stderr();
        Self::bind_with_audit(config, audit)
    }

    /// Como [`Server::bind`], pero con un audit log arbitrario
    ///
    /// Las pruebas lo usan para capturar las líneas de auditoría.
    pub fn bind_with_audit(config: Config, audit: AuditLog) -> io::Result<Self> {
        let listener = TcpListener::bind(config.address())?;

        // La cola se dimensiona al número de workers: el accept loop
        // nunca se adelanta más de un lote de conexiones pendientes
        let queue = ConnectionQueue::new(config.threads);

        let handler = Handler::new(
            LockRegistry::new(),
            audit,
            PathBuf::from(&config.root),
        );

        Ok(Self {
            config,
            listener,
            queue,
            handler,
        })
    }

    /// Dirección local real (útil con puerto 0 en las pruebas)
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Inicia los workers y corre el accept loop
    ///
    /// Bloquea para siempre: el servidor corre hasta que el proceso
    /// muera. Un error de accept se registra y el loop continúa.
    pub fn run(self) -> io::Result<()> {
        self.spawn_workers();

        println!("[+] Servidor escuchando en {}", self.config.address());
        println!("[*] Sirviendo archivos desde {}\n", self.config.root);

        for stream in self.listener.incoming() {
            match stream {
                Ok(stream) => {
                    // El push bloquea si la cola está llena; ninguna
                    // conexión aceptada se descarta
                    self.queue.push(stream);
                }
                Err(e) => {
                    eprintln!("[!] Error al aceptar conexion: {}", e);
                }
            }
        }

        Ok(())
    }

    /// Lanza los N worker threads del pool
    fn spawn_workers(&self) {
        for i in 0..self.config.threads {
            let queue = self.queue.clone();
            let handler = self.handler.clone();

            thread::spawn(move || {
                Self::worker_loop(i, queue, handler);
            });
        }
    }

    /// Loop principal de un worker: desencolar, manejar, cerrar, repetir
    fn worker_loop(id: usize, queue: ConnectionQueue<TcpStream>, handler: Handler) {
        println!("[*] Worker {} listo", id);

        loop {
            let stream = queue.pop();
            handler.handle_connection(stream);
            // El stream se cerró al destruirse la conexión
        }
    }
}
