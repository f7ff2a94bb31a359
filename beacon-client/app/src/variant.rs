use crate::domain::Variant;
use parking_lot::RwLock;
use rand::Rng;

/// Holds the A/B variant the current session is assigned to.
#[derive(Debug)]
pub struct VariantAssignment {
    current: RwLock<Variant>,
}

impl Default for VariantAssignment {
    fn default() -> Self {
        Self::new(Variant::A)
    }
}

impl VariantAssignment {
    pub fn new(initial: Variant) -> Self {
        Self {
            current: RwLock::new(initial),
        }
    }

    pub fn variant(&self) -> Variant {
        *self.current.read()
    }

    pub fn set_variant(&self, variant: Variant) {
        *self.current.write() = variant;
    }

    /// Picks a fresh variant uniformly at random and returns it.
    pub fn reset(&self) -> Variant {
        let variant = if rand::rng().random_bool(0.5) {
            Variant::A
        } else {
            Variant::B
        };
        self.set_variant(variant);
        variant
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_a() {
        assert_eq!(VariantAssignment::default().variant(), Variant::A);
    }

    #[test]
    fn set_variant_overrides() {
        let assignment = VariantAssignment::default();
        assignment.set_variant(Variant::B);
        assert_eq!(assignment.variant(), Variant::B);
    }

    #[test]
    fn reset_eventually_yields_both_variants() {
        let assignment = VariantAssignment::default();
        let mut seen_a = false;
        let mut seen_b = false;
        for _ in 0..200 {
            let picked = assignment.reset();
            assert_eq!(assignment.variant(), picked);
            match picked {
                Variant::A => seen_a = true,
                Variant::B => seen_b = true,
            }
        }
        assert!(seen_a && seen_b);
    }
}
