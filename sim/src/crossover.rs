use rand::Rng;
use rand_distr::StandardNormal;
use shared::Genome;
use std::ops::Range;

/// Rounds attempted at most per crossover
const MAX_ROUNDS: usize = 2;

/// Attempts at fitting a window on the second strand
const PARTNER_WINDOW_ATTEMPTS: usize = 3;

/// Standard deviation of the partner window's boundary jitter
const PARTNER_JITTER: f64 = 2.0;

/// Recombine two strands in place.
///
/// Before each of up to two rounds the process stops with probability 1/3.
/// Returns how many rounds actually exchanged a window.
pub fn crossover<R: Rng + ?Sized>(a: &mut Genome, b: &mut Genome, rng: &mut R) -> usize {
    let mut exchanged = 0;
    for _ in 0..MAX_ROUNDS {
        if rng.gen_range(0..3) == 0 {
            break;
        }
        if crossover_once(a, b, rng).is_some() {
            exchanged += 1;
        }
    }
    exchanged
}

/// Swap one window of `a` with a nearby window of `b`.
///
/// Returns the exchanged windows, or `None` (both strands untouched) when
/// either window is degenerate.
pub fn crossover_once<R: Rng + ?Sized>(
    a: &mut Genome,
    b: &mut Genome,
    rng: &mut R,
) -> Option<(Range<usize>, Range<usize>)> {
    let window_a = primary_window(a.len(), rng)?;
    let window_b = partner_window(&window_a, b.len(), rng)?;

    let new_a = splice(a, window_a.clone(), &b.as_slice()[window_b.clone()]);
    let new_b = splice(b, window_b.clone(), &a.as_slice()[window_a.clone()]);
    *a = new_a;
    *b = new_b;
    Some((window_a, window_b))
}

fn normal<R: Rng + ?Sized>(mean: f64, sd: f64, rng: &mut R) -> f64 {
    let z: f64 = rng.sample(StandardNormal);
    mean + z * sd
}

/// Window on a strand of length `n`, centered near either end.
fn primary_window<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Option<Range<usize>> {
    let len = n as f64;
    let sd = len / 12.0;
    let mode = if rng.gen_bool(0.5) { len / 6.0 } else { 5.0 * len / 6.0 };
    let center = normal(mode, sd, rng);
    let half = normal(len / 6.0, sd, rng);

    let last = n as i64 - 1;
    let beg = (center - half) as i64;
    let end = (center + half) as i64;
    if (half as i64) <= 0 || beg >= last || end <= 1 {
        return None;
    }
    Some(beg.max(0) as usize..end.min(last) as usize)
}

/// Jittered copy of `primary` that fits a strand of length `m`
fn partner_window<R: Rng + ?Sized>(primary: &Range<usize>, m: usize, rng: &mut R) -> Option<Range<usize>> {
    let last = m as i64 - 1;
    for _ in 0..PARTNER_WINDOW_ATTEMPTS {
        let beg = normal(0.0, PARTNER_JITTER, rng) as i64 + primary.start as i64;
        let end = normal(0.0, PARTNER_JITTER, rng) as i64 + primary.end as i64;
        if (0..last).contains(&beg) && end > 1 && end <= last && beg < end {
            return Some(beg as usize..end as usize);
        }
    }
    None
}

/// `genome` with `window` replaced by `insert`
fn splice(genome: &Genome, window: Range<usize>, insert: &[shared::Instruction]) -> Genome {
    let symbols = genome.as_slice();
    symbols[..window.start]
        .iter()
        .chain(insert)
        .chain(&symbols[window.end..])
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use shared::Instruction;

    fn g(symbols: &str) -> Genome {
        symbols.parse().unwrap()
    }

    fn counts(genome: &Genome) -> [usize; 3] {
        let mut counts = [0; 3];
        for symbol in genome.iter() {
            let slot = Instruction::ALPHABET.iter().position(|&s| s == symbol).unwrap();
            counts[slot] += 1;
        }
        counts
    }

    #[test]
    fn test_splice() {
        let genome = g("NNNNNN");
        let spliced = splice(&genome, 2..4, &[Instruction::Energy; 3]);
        assert_eq!(spliced.to_string(), "NNEEENN");
    }

    #[test]
    fn test_short_strands_never_cross() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..200 {
            let mut a = g("NR");
            let mut b = g("RE");
            assert!(crossover_once(&mut a, &mut b, &mut rng).is_none());
            assert_eq!(a, g("NR"));
            assert_eq!(b, g("RE"));
        }
    }

    #[test]
    fn test_empty_strands_never_cross() {
        let mut rng = StdRng::seed_from_u64(12);
        let mut a = Genome::new();
        let mut b = g("NRENRENRE");
        assert_eq!(crossover(&mut a, &mut b, &mut rng), 0);
        assert!(a.is_empty());
    }

    #[test]
    fn test_long_strands_eventually_cross() {
        let mut rng = StdRng::seed_from_u64(13);
        let original_a = Genome::from(vec![Instruction::Nop; 60]);
        let original_b = Genome::from(vec![Instruction::Energy; 60]);

        let crossed = (0..100).any(|_| {
            let mut a = original_a.clone();
            let mut b = original_b.clone();
            crossover_once(&mut a, &mut b, &mut rng).is_some()
                && a.iter().any(|s| s == Instruction::Energy)
                && b.iter().any(|s| s == Instruction::Nop)
        });
        assert!(crossed);
    }

    #[test]
    fn test_windows_respect_bounds() {
        let mut rng = StdRng::seed_from_u64(14);
        for n in [0, 1, 2, 3, 6, 12, 30, 90] {
            for _ in 0..200 {
                if let Some(window) = primary_window(n, &mut rng) {
                    assert!(window.start < window.end);
                    assert!(window.end <= n.saturating_sub(1));
                    if let Some(partner) = partner_window(&window, n, &mut rng) {
                        assert!(partner.start < partner.end);
                        assert!(partner.end < n);
                    }
                }
            }
        }
    }

    proptest! {
        #[test]
        fn prop_round_conserves_symbols(
            a in "[NRE]{0,48}",
            b in "[NRE]{0,48}",
            seed in any::<u64>(),
        ) {
            let mut rng = StdRng::seed_from_u64(seed);
            let (orig_a, orig_b) = (g(&a), g(&b));
            let (mut new_a, mut new_b) = (orig_a.clone(), orig_b.clone());

            match crossover_once(&mut new_a, &mut new_b, &mut rng) {
                Some((window_a, window_b)) => {
                    // each strand changes by the size difference of the swapped windows
                    let swing = window_b.len() as i64 - window_a.len() as i64;
                    prop_assert_eq!(new_a.len() as i64, orig_a.len() as i64 + swing);
                    prop_assert_eq!(new_b.len() as i64, orig_b.len() as i64 - swing);
                    let landed_in_a = window_a.start..window_a.start + window_b.len();
                    let landed_in_b = window_b.start..window_b.start + window_a.len();
                    prop_assert_eq!(&new_a.as_slice()[landed_in_a], &orig_b.as_slice()[window_b]);
                    prop_assert_eq!(&new_b.as_slice()[landed_in_b], &orig_a.as_slice()[window_a]);
                }
                None => {
                    prop_assert_eq!(&new_a, &orig_a);
                    prop_assert_eq!(&new_b, &orig_b);
                }
            }

            let before: Vec<usize> = counts(&orig_a).iter().zip(counts(&orig_b)).map(|(x, y)| x + y).collect();
            let after: Vec<usize> = counts(&new_a).iter().zip(counts(&new_b)).map(|(x, y)| x + y).collect();
            prop_assert_eq!(before, after);
        }

        #[test]
        fn prop_crossover_rounds_are_capped(a in "[NRE]{0,48}", b in "[NRE]{0,48}", seed in any::<u64>()) {
            let mut rng = StdRng::seed_from_u64(seed);
            let (mut a, mut b) = (g(&a), g(&b));
            prop_assert!(crossover(&mut a, &mut b, &mut rng) <= MAX_ROUNDS);
        }
    }
}
