//! Benchmark registry.
//!
//! Every benchmark the driver knows about is a frozen [`BenchmarkSpec`].
//! The registry is built once at startup, either from the built-in table
//! or from a configuration file, and never changes afterwards.

use crate::error::{DriverError, Result};
use crate::extract::Extraction;
use crate::template::ArgTemplate;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Repetition argument appended when none is configured
pub const DEFAULT_REPEAT_ARG: &str = "-r {}";

/// Who repeats the measurement
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Repetition {
    /// Launch once and let the benchmark loop internally; the template is
    /// rendered with the repetition count and appended to the arguments.
    InternalLoop(ArgTemplate),
    /// Launch once per sample.
    Launches,
}

/// Merge key for `all_results.csv`: family plus header-rendered arguments
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupKey {
    pub family: String,
    pub args: String,
}

/// One configured benchmark
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BenchmarkSpec {
    /// Unique name, e.g. "lcs-fj2"
    pub name: String,
    /// Program family shared by all variants, e.g. "lcs"
    pub family: String,
    /// Implementation strategy label, e.g. "fj"
    pub variant: String,
    /// Arguments with slots for `P` and `P * 4`
    pub args: ArgTemplate,
    /// Samples to collect per core count
    pub runs: usize,
    pub extraction: Extraction,
    pub repetition: Repetition,
    /// Runs once at P = 1 instead of sweeping core counts
    pub single_core: bool,
}

impl BenchmarkSpec {
    /// Process launches needed for one core count
    pub fn launches_per_core_count(&self) -> usize {
        match self.repetition {
            Repetition::InternalLoop(_) => 1,
            Repetition::Launches => self.runs,
        }
    }

    /// Extra argument asking the benchmark to repeat itself, if any
    pub fn repeat_arg(&self) -> Option<String> {
        match &self.repetition {
            Repetition::InternalLoop(template) => Some(template.render(&[self.runs])),
            Repetition::Launches => None,
        }
    }

    pub fn group_key(&self) -> GroupKey {
        GroupKey {
            family: self.family.clone(),
            args: self.args.for_header(),
        }
    }
}

/// Benchmark entry as written in a configuration file.
///
/// Only `args` and `runs` are required; everything else is inferred from
/// the name when absent.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BenchmarkEntry {
    pub args: String,
    pub runs: usize,
    #[serde(default)]
    pub family: Option<String>,
    #[serde(default)]
    pub variant: Option<String>,
    #[serde(default)]
    pub single_core: Option<bool>,
    #[serde(default)]
    pub extraction: Option<Extraction>,
    /// One-slot template for the repetition argument
    #[serde(default)]
    pub repeat_arg: Option<String>,
    /// Force one launch per sample
    #[serde(default)]
    pub launches: Option<bool>,
}

impl BenchmarkEntry {
    /// Freeze into a spec, filling unset fields from naming conventions
    pub fn into_spec(self, name: &str) -> Result<BenchmarkSpec> {
        let (inferred_family, inferred_variant) = split_name(name);
        let extraction = self.extraction.unwrap_or_else(|| Extraction::infer(name));
        let launches = self
            .launches
            .unwrap_or_else(|| extraction != Extraction::Summary);
        let repetition = if launches {
            Repetition::Launches
        } else {
            let raw = self.repeat_arg.as_deref().unwrap_or(DEFAULT_REPEAT_ARG);
            Repetition::InternalLoop(ArgTemplate::parse(name, raw, 1)?)
        };

        Ok(BenchmarkSpec {
            name: name.to_string(),
            family: self.family.unwrap_or(inferred_family),
            variant: self.variant.unwrap_or(inferred_variant),
            args: ArgTemplate::parse(name, &self.args, 2)?,
            runs: self.runs,
            extraction,
            repetition,
            single_core: self.single_core.unwrap_or_else(|| name.contains("se")),
        })
    }
}

/// Split "ferret-cilk-future" into ("ferret", "cilk-future") and
/// "lcs-se2" into ("lcs", "se").
fn split_name(name: &str) -> (String, String) {
    let program = crate::locate::program_name(name);
    match program.split_once('-') {
        Some((family, variant)) => (family.to_string(), variant.to_string()),
        None => (program.to_string(), String::new()),
    }
}

/// The frozen set of benchmarks, kept in run order.
pub struct BenchmarkRegistry {
    benchmarks: Vec<BenchmarkSpec>,
}

impl BenchmarkRegistry {
    /// Build a registry. Benchmarks are sorted by name in reverse so that
    /// the slowest family (bst) runs last.
    pub fn from_specs(mut benchmarks: Vec<BenchmarkSpec>) -> Result<Self> {
        benchmarks.sort_by(|a, b| b.name.cmp(&a.name));
        if let Some(pair) = benchmarks.windows(2).find(|w| w[0].name == w[1].name) {
            return Err(DriverError::DuplicateBenchmark(pair[0].name.clone()));
        }
        Ok(Self { benchmarks })
    }

    /// Build from configuration-file entries
    pub fn from_entries(entries: BTreeMap<String, BenchmarkEntry>) -> Result<Self> {
        let specs = entries
            .into_iter()
            .map(|(name, entry)| entry.into_spec(&name))
            .collect::<Result<Vec<_>>>()?;
        Self::from_specs(specs)
    }

    /// All benchmarks in run order
    pub fn all(&self) -> &[BenchmarkSpec] {
        &self.benchmarks
    }

    pub fn find(&self, name: &str) -> Option<&BenchmarkSpec> {
        self.benchmarks.iter().find(|b| b.name == name)
    }

    /// Names in run order
    pub fn list_names(&self) -> Vec<&str> {
        self.benchmarks.iter().map(|b| b.name.as_str()).collect()
    }

    /// Benchmarks to run for the given names, in run order.
    ///
    /// An empty selection means every benchmark.
    pub fn select(&self, names: &[String]) -> Result<Vec<&BenchmarkSpec>> {
        if names.is_empty() {
            return Ok(self.benchmarks.iter().collect());
        }
        if let Some(unknown) = names.iter().find(|n| self.find(n).is_none()) {
            return Err(DriverError::UnknownBenchmark(unknown.clone()));
        }
        Ok(self
            .benchmarks
            .iter()
            .filter(|b| names.iter().any(|n| *n == b.name))
            .collect())
    }
}

/// One family of variants sharing a binary and argument shape
struct FamilyDef {
    family: &'static str,
    /// Appended to every variant name, e.g. "2" for a second argument set
    suffix: &'static str,
    args: &'static str,
    runs: usize,
    extraction: Extraction,
    variants: &'static [&'static str],
}

const FAMILIES: &[FamilyDef] = &[
    FamilyDef {
        family: "mm",
        suffix: "",
        args: "-n 4096",
        runs: 10,
        extraction: Extraction::Summary,
        variants: &["se", "fj", "sf"],
    },
    FamilyDef {
        family: "smm",
        suffix: "",
        args: "-n 4096",
        runs: 10,
        extraction: Extraction::Summary,
        variants: &["se", "fj", "sf"],
    },
    FamilyDef {
        family: "sort",
        suffix: "",
        args: "-n 100000000",
        runs: 10,
        extraction: Extraction::Summary,
        variants: &["se", "fj", "sf"],
    },
    FamilyDef {
        family: "hw",
        suffix: "",
        args: "$(find futurerd-bench -name test.avi) 104 {}",
        runs: 10,
        extraction: Extraction::Hw,
        variants: &["se", "fj", "sf", "gf"],
    },
    FamilyDef {
        family: "lcs",
        suffix: "",
        args: "-n 32768 -b 512",
        runs: 10,
        extraction: Extraction::Summary,
        variants: &["se", "fj", "sf", "gf"],
    },
    FamilyDef {
        family: "lcs",
        suffix: "2",
        args: "-n 32768 -b 1024",
        runs: 10,
        extraction: Extraction::Summary,
        variants: &["se", "fj", "sf", "gf"],
    },
    FamilyDef {
        family: "sw",
        suffix: "",
        args: "-n 2048 -b 32",
        runs: 10,
        extraction: Extraction::Summary,
        variants: &["se", "fj", "sf", "gf"],
    },
    FamilyDef {
        family: "bst",
        suffix: "",
        args: "-s1 8000000 -s2 4000000",
        runs: 5,
        extraction: Extraction::Bst,
        variants: &["se", "fj", "gf"],
    },
    FamilyDef {
        family: "ferret",
        suffix: "",
        args: "./ferret/data/native/corel/ lsh ./ferret/data/native/queries/ 10 {} fpiper.out {}",
        runs: 10,
        extraction: Extraction::Ferret,
        variants: &["serial", "piper"],
    },
    FamilyDef {
        family: "ferret",
        suffix: "",
        args: "./ferret/data/native/corel/ lsh ./ferret/data/native/queries/ 10 {} fcilk.out {}",
        runs: 10,
        extraction: Extraction::Ferret,
        variants: &["cilk-future"],
    },
    FamilyDef {
        family: "fib",
        suffix: "",
        args: "42",
        runs: 10,
        extraction: Extraction::Summary,
        variants: &["se", "fj", "sf", "sf-stack"],
    },
];

/// Build the default registry with all benchmarks
pub fn build_registry() -> Result<BenchmarkRegistry> {
    let mut specs = Vec::new();

    for def in FAMILIES {
        for &variant in def.variants {
            let name = format!("{}-{}{}", def.family, variant, def.suffix);
            let repetition = match def.extraction {
                Extraction::Summary => {
                    Repetition::InternalLoop(ArgTemplate::parse(&name, DEFAULT_REPEAT_ARG, 1)?)
                }
                _ => Repetition::Launches,
            };
            specs.push(BenchmarkSpec {
                args: ArgTemplate::parse(&name, def.args, 2)?,
                family: def.family.to_string(),
                variant: variant.to_string(),
                runs: def.runs,
                extraction: def.extraction,
                repetition,
                single_core: matches!(variant, "se" | "serial"),
                name,
            });
        }
    }

    BenchmarkRegistry::from_specs(specs)
}
