use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{mapping::CanonicalMapping, name};

/// Shape of a synthetic result set.
#[derive(Clone, Debug)]
pub struct SyntheticShape {
    pub groups: usize,
    pub variants: Vec<String>,
    /// Parameter values per group; empty for unparameterized groups.
    pub params: Vec<u32>,
}

impl SyntheticShape {
    pub fn allocator_suite(groups: usize) -> Self {
        Self {
            groups,
            variants: ["system", "rt_nightly", "rt_std", "mimalloc", "jemalloc"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            params: vec![8, 64, 256, 1024, 4096],
        }
    }
}

/// Deterministic mapping with values between 10ns and ~10ms.
pub fn generate_mapping(shape: &SyntheticShape, seed: u64) -> CanonicalMapping {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut mapping = CanonicalMapping::new();
    for g in 0..shape.groups {
        let group = format!("group_{g}");
        for variant in &shape.variants {
            if shape.params.is_empty() {
                mapping.insert(name::join(&group, variant, None), sample_ns(&mut rng));
                continue;
            }
            for param in &shape.params {
                let param = param.to_string();
                mapping.insert(name::join(&group, variant, Some(&param)), sample_ns(&mut rng));
            }
        }
    }
    mapping
}

/// Scales every value by a random factor in `1 ± spread`, drops roughly
/// `churn` of the names and adds as many fresh ones.
pub fn perturb(base: &CanonicalMapping, spread: f64, churn: f64, seed: u64) -> CanonicalMapping {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut head = CanonicalMapping::new();
    let mut dropped = 0usize;
    for (name, value) in base.iter() {
        if rng.r#gen::<f64>() < churn {
            dropped += 1;
            continue;
        }
        let factor = 1.0 + rng.gen_range(-spread..=spread);
        head.insert(name, value * factor);
    }
    for idx in 0..dropped {
        head.insert(format!("fresh_{idx}/rt_std"), sample_ns(&mut rng));
    }
    head
}

fn sample_ns(rng: &mut StdRng) -> f64 {
    10f64.powf(rng.gen_range(1.0..7.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_is_deterministic() {
        let shape = SyntheticShape::allocator_suite(3);
        let a = generate_mapping(&shape, 7);
        assert_eq!(a, generate_mapping(&shape, 7));
        assert_eq!(a.len(), 3 * 5 * 5);
    }

    #[test]
    fn test_perturb_keeps_size() {
        let base = generate_mapping(&SyntheticShape::allocator_suite(2), 1);
        let head = perturb(&base, 0.1, 0.2, 2);
        assert_eq!(head.len(), base.len());
    }
}
