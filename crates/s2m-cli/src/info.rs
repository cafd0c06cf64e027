//! Fixed texts printed for the `help`, `input` and `usage` keywords.

const HELP: &str = "\
calculate-stats reads the S2M simulation report files in a data directory,
groups the replicates of each parameter setting and writes per-passage
statistics (min, max, mean, median, population standard deviation) for every
result column into one tab-delimited file per replicate set.

Families: fitness1/fitness2 defaults, recombination (r), synergy (s),
error rate (e) and accelerator (a).

Before any statistics are computed every report must contain the same number
of passages. If they do not, the run stops and reports
\"OK to proceed: false\".
";

const INPUT: &str = "\
Report files live in one directory (default ./Reportfiles/) and must contain
\"report\" in their name. Two filename conventions are understood:

  hyphenated   fitness2-a2_rep5.report   fitness1-default_rep3.report
               markers -rN -sN -eX.XX -aN, replicate index _repN
  underscored  fit2_a2.report5           fit1_default.report3
               markers _rN _sN _eX.XX _aN, replicate index reportN

Each file holds one header line, one line per passage and one trailing line.
Passage lines hold numeric cells separated by tabs, spaces or commas.
";

const USAGE: &str = "\
usage: calculate-stats [help|input|usage]
       calculate-stats [OPTIONS] [DATA_DIR [STAT_DIR]]

  DATA_DIR             report directory (default ./Reportfiles/), preferably absolute
  STAT_DIR             statistics directory (default ./Statfiles/)
  --naming <NAMING>    hyphenated (default) or underscored
  --config <FILE>      YAML run configuration; arguments override it
  --quiet              log to calculate_stats.log only

Exit status: 0 completed, 1 passage counts inconsistent, 2 setup failure.
";

/// Keyword accepted in place of the data directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topic {
    Help,
    Input,
    Usage,
}

impl Topic {
    /// Matches `help`, `input` and `usage` in any letter case.
    pub fn from_keyword(arg: &str) -> Option<Self> {
        match arg.to_ascii_lowercase().as_str() {
            "help" => Some(Topic::Help),
            "input" => Some(Topic::Input),
            "usage" => Some(Topic::Usage),
            _ => None,
        }
    }

    pub fn text(self) -> &'static str {
        match self {
            Topic::Help => HELP,
            Topic::Input => INPUT,
            Topic::Usage => USAGE,
        }
    }
}
