//! # Cola de Conexiones
//! src/server/queue.rs
//!
//! Cola FIFO acotada y thread-safe que conecta el accept loop con el
//! pool de workers. Es el único punto de traspaso de memoria compartida
//! entre el productor (accept loop) y los consumidores (workers).
//!
//! - `push` bloquea mientras la cola esté llena
//! - `pop` bloquea mientras la cola esté vacía
//! - Ninguna entrada se descarta jamás
//!
//! La capacidad se fija al construirla (dimensionada al número de
//! workers, para que el accept loop nunca se adelante más de un lote).

use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex};

/// Cola FIFO acotada con push y pop bloqueantes
///
/// `T` es normalmente el `TcpStream` de una conexión aceptada; es
/// genérica para poder probar la semántica de la cola con valores
/// simples.
pub struct ConnectionQueue<T> {
    /// Buffer FIFO interno
    inner: Arc<Mutex<VecDeque<T>>>,

    /// Condvar para despertar consumidores (hay elementos)
    not_empty: Arc<Condvar>,

    /// Condvar para despertar al productor (hay espacio)
    not_full: Arc<Condvar>,

    /// Capacidad máxima de la cola
    capacity: usize,
}

impl<T> ConnectionQueue<T> {
    /// Crea una nueva cola con la capacidad indicada (mínimo 1)
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(VecDeque::new())),
            not_empty: Arc::new(Condvar::new()),
            not_full: Arc::new(Condvar::new()),
            capacity: capacity.max(1),
        }
    }

    /// Encola un elemento, bloqueando hasta que haya espacio libre
    pub fn push(&self, item: T) {
        let mut queue = self.inner.lock().unwrap();

        while queue.len() >= self.capacity {
            queue = self.not_full.wait(queue).unwrap();
        }

        queue.push_back(item);

        // Notificar a workers esperando
        self.not_empty.notify_one();
    }

    /// Desencola el elemento más antiguo, bloqueando hasta que haya uno
    pub fn pop(&self) -> T {
        let mut queue = self.inner.lock().unwrap();

        loop {
            if let Some(item) = queue.pop_front() {
                // Notificar al productor que se liberó un slot
                self.not_full.notify_one();
                return item;
            }

            // Esperar a que haya elementos
            queue = self.not_empty.wait(queue).unwrap();
        }
    }

    /// Intenta desencolar sin bloquear
    ///
    /// Retorna `Some(item)` si había un elemento, `None` si la cola
    /// estaba vacía
    pub fn try_pop(&self) -> Option<T> {
        let mut queue = self.inner.lock().unwrap();
        let item = queue.pop_front();
        if item.is_some() {
            self.not_full.notify_one();
        }
        item
    }

    /// Retorna el tamaño actual de la cola
    pub fn len(&self) -> usize {
        let queue = self.inner.lock().unwrap();
        queue.len()
    }

    /// Verifica si la cola está vacía
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Retorna la capacidad máxima
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<T> Clone for ConnectionQueue<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            not_empty: Arc::clone(&self.not_empty),
            not_full: Arc::clone(&self.not_full),
            capacity: self.capacity,
        }
    }
}
