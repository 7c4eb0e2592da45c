//! # Registro de Locks por Recurso
//! src/server/locks.rs
//!
//! Mapea cada identificador de recurso (el URI pedido) a un
//! `RwLock` propio, creado la primera vez que alguien referencia ese
//! URI y nunca destruido durante la vida del proceso.
//!
//! La disciplina de uso es la de lectores/escritor:
//! - GET adquiere el lock en modo compartido (lecturas concurrentes)
//! - PUT lo adquiere en modo exclusivo (un solo escritor, sin lectores)
//!
//! La mutación del mapa está serializada por un único mutex de registro,
//! distinto de los locks individuales: dos workers que descubren el
//! mismo URI nuevo a la vez no pueden crear locks duplicados. El mutex
//! de registro se suelta apenas se obtiene el lock del recurso; nunca se
//! mantiene durante I/O de archivos.
//!
//! El crecimiento del mapa es acotado en la práctica (los URIs son un
//! conjunto pequeño y repetido de rutas), así que no hay eviction.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

/// Registro de locks lectores/escritor, uno por URI
pub struct LockRegistry {
    /// Mapa URI -> lock del recurso, protegido por el mutex de registro
    locks: Arc<Mutex<HashMap<String, Arc<RwLock<()>>>>>,
}

impl LockRegistry {
    /// Crea un registro vacío
    pub fn new() -> Self {
        Self {
            locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Obtiene el lock del recurso, creándolo si es la primera vez
    ///
    /// El chequeo de existencia y la inserción ocurren atómicamente bajo
    /// el mutex de registro (vía `entry`), así que para cada URI existe
    /// a lo sumo una instancia de lock durante toda la vida del proceso.
    ///
    /// # Ejemplo
    /// ```
    /// use file_server::server::locks::LockRegistry;
    ///
    /// let registry = LockRegistry::new();
    /// let lock = registry.acquire("/notes.txt");
    ///
    /// let _guard = lock.read().unwrap(); // modo compartido (GET)
    /// ```
    pub fn acquire(&self, uri: &str) -> Arc<RwLock<()>> {
        let mut map = self.locks.lock().unwrap();
        map.entry(uri.to_string())
            .or_insert_with(|| Arc::new(RwLock::new(())))
            .clone()
    }

    /// Cantidad de recursos con lock registrado (para observabilidad y tests)
    pub fn len(&self) -> usize {
        let map = self.locks.lock().unwrap();
        map.len()
    }

    /// Verifica si el registro está vacío
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for LockRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for LockRegistry {
    fn clone(&self) -> Self {
        Self {
            locks: Arc::clone(&self.locks),
        }
    }
}
