// ============================================================================
// Structure : PriceWindow
// ============================================================================
// Fenêtre glissante des derniers prix observés pour UN token
//
// CONCEPTS RUST :
// 1. VecDeque : file double (push à la fin, pop au début en O(1))
// 2. Encapsulation : le buffer est privé, la capacité est garantie par append()
// ============================================================================

use std::collections::VecDeque;

/// Nombre de prix conservés par token
pub const WINDOW_CAPACITY: usize = 20;

/// Buffer borné des prix d'un token, du plus ancien au plus récent
#[derive(Debug, Clone, PartialEq)]
pub struct PriceWindow {
    samples: VecDeque<f64>,
    capacity: usize,
}

impl PriceWindow {
    /// Crée une fenêtre vide de capacité WINDOW_CAPACITY (20)
    pub fn new() -> Self {
        Self::with_capacity(WINDOW_CAPACITY)
    }

    /// Crée une fenêtre vide de capacité arbitraire (au moins 1)
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Ajoute un prix en queue ; le plus ancien est éjecté si la fenêtre est pleine
    ///
    /// Ne peut pas échouer : après l'appel, len() <= capacity()
    pub fn append(&mut self, price: f64) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(price);
    }

    /// Copie ordonnée des prix (plus ancien en premier), sans muter la fenêtre
    ///
    /// CONCEPT RUST : make_contiguous() demanderait &mut self,
    /// on passe donc par un itérateur pour rester en lecture seule
    pub fn snapshot(&self) -> Vec<f64> {
        self.samples.iter().copied().collect()
    }

    /// Dernier prix reçu
    pub fn latest(&self) -> Option<f64> {
        self.samples.back().copied()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for PriceWindow {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================
