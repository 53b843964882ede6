//! Built-in generators, conditions and weights for trying the engine from the
//! command line. Real conjectures are written against the library directly.
use clap::ValueEnum;
use std::thread;
use std::time::Duration;

pub type Candidates = Box<dyn Iterator<Item = u64>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GeneratorKind {
    /// 0, 1, 2, ... without end
    Naturals,
    /// 0, 1, ..., limit - 1 (limit defaults to the number of checks)
    Range,
    /// 0, 1, 4, 9, ...
    Squares,
    /// 2, 3, 5, 7, ...
    Primes,
}

impl GeneratorKind {
    pub fn name(self) -> &'static str {
        match self {
            GeneratorKind::Naturals => "naturals",
            GeneratorKind::Range => "range",
            GeneratorKind::Squares => "squares",
            GeneratorKind::Primes => "primes",
        }
    }

    pub fn candidates(self, checks: u64, limit: Option<u64>) -> Candidates {
        match self {
            GeneratorKind::Naturals => Box::new(0u64..),
            GeneratorKind::Range => Box::new(0..limit.unwrap_or(checks)),
            GeneratorKind::Squares => Box::new((0u64..).map(|x| x * x)),
            GeneratorKind::Primes => Box::new((2u64..).filter(is_prime)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConditionKind {
    Even,
    Odd,
    Prime,
    /// Holds for every candidate
    Always,
    /// Sleeps 100us, then holds; useful to watch the progress bar
    Sleep,
    #[value(name = "below-1000")]
    Below1000,
}

impl ConditionKind {
    pub fn name(self) -> &'static str {
        match self {
            ConditionKind::Even => "even",
            ConditionKind::Odd => "odd",
            ConditionKind::Prime => "prime",
            ConditionKind::Always => "always",
            ConditionKind::Sleep => "sleep",
            ConditionKind::Below1000 => "below-1000",
        }
    }

    pub fn holds(self, x: &u64) -> bool {
        match self {
            ConditionKind::Even => x % 2 == 0,
            ConditionKind::Odd => x % 2 == 1,
            ConditionKind::Prime => is_prime(x),
            ConditionKind::Always => true,
            ConditionKind::Sleep => {
                thread::sleep(Duration::from_micros(100));
                true
            }
            ConditionKind::Below1000 => *x < 1000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum WeightKind {
    Identity,
    Negate,
    #[value(name = "digit-sum")]
    DigitSum,
}

impl WeightKind {
    pub fn name(self) -> &'static str {
        match self {
            WeightKind::Identity => "identity",
            WeightKind::Negate => "negate",
            WeightKind::DigitSum => "digit-sum",
        }
    }

    pub fn weigh(self, x: &u64) -> i128 {
        let x = i128::from(*x);
        match self {
            WeightKind::Identity => x,
            WeightKind::Negate => -x,
            WeightKind::DigitSum => {
                let mut rest = x;
                let mut sum = 0;
                while rest > 0 {
                    sum += rest % 10;
                    rest /= 10;
                }
                sum
            }
        }
    }
}

fn is_prime(n: &u64) -> bool {
    let n = *n;
    if n < 2 {
        return false;
    }
    if n % 2 == 0 {
        return n == 2;
    }
    let mut d = 3;
    while d * d <= n {
        if n % d == 0 {
            return false;
        }
        d += 2;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generators() {
        let firsts = |g: GeneratorKind| g.candidates(5, None).take(5).collect::<Vec<_>>();
        assert_eq!(firsts(GeneratorKind::Naturals), vec![0, 1, 2, 3, 4]);
        assert_eq!(firsts(GeneratorKind::Squares), vec![0, 1, 4, 9, 16]);
        assert_eq!(firsts(GeneratorKind::Primes), vec![2, 3, 5, 7, 11]);
        assert_eq!(GeneratorKind::Range.candidates(10, Some(3)).count(), 3);
        assert_eq!(GeneratorKind::Range.candidates(10, None).count(), 10);
    }

    #[test]
    fn test_conditions() {
        assert!(ConditionKind::Even.holds(&4));
        assert!(!ConditionKind::Odd.holds(&4));
        assert!(ConditionKind::Prime.holds(&97));
        assert!(!ConditionKind::Prime.holds(&91));
        assert!(ConditionKind::Below1000.holds(&999));
        assert!(!ConditionKind::Below1000.holds(&1000));
    }

    #[test]
    fn test_weights() {
        assert_eq!(WeightKind::Identity.weigh(&42), 42);
        assert_eq!(WeightKind::Negate.weigh(&42), -42);
        assert_eq!(WeightKind::DigitSum.weigh(&1234), 10);
    }

    #[test]
    fn test_names_match_cli_values() {
        for kind in GeneratorKind::value_variants() {
            let value = kind.to_possible_value().unwrap();
            assert_eq!(value.get_name(), kind.name());
        }
        for kind in ConditionKind::value_variants() {
            let value = kind.to_possible_value().unwrap();
            assert_eq!(value.get_name(), kind.name());
        }
        for kind in WeightKind::value_variants() {
            let value = kind.to_possible_value().unwrap();
            assert_eq!(value.get_name(), kind.name());
        }
    }
}
