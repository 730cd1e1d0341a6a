use rand::Rng;

use crate::models::ParamValue;
use crate::space::ParameterDomain;

/// Draw one candidate uniformly at random, with replacement.
///
/// Domains are never empty, so this always yields a value; a singleton
/// domain always yields its sole element.
pub fn sample<'a, R: Rng + ?Sized>(rng: &mut R, domain: &'a ParameterDomain) -> &'a ParamValue {
    let values = domain.values();
    &values[rng.gen_range(0..values.len())]
}

/// Draw `n` independent candidates from the same domain.
pub fn sample_many<R: Rng + ?Sized>(
    rng: &mut R,
    domain: &ParameterDomain,
    n: usize,
) -> Vec<ParamValue> {
    (0..n).map(|_| sample(rng, domain).clone()).collect()
}
