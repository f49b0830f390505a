//! What happened during a read

use std::fmt;

use crate::codec::Fallback;

/// Number of cells that went through each [`Fallback`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FallbackCounts {
    pub shared_string_index: usize,
    pub style_index: usize,
    pub date_serial: usize,
    pub number_text: usize,
    pub date_text: usize,
}

impl FallbackCounts {
    pub fn record(&mut self, fallback: Fallback) {
        *self.slot(fallback) += 1;
    }

    pub fn get(&self, fallback: Fallback) -> usize {
        match fallback {
            Fallback::SharedStringIndex => self.shared_string_index,
            Fallback::StyleIndex => self.style_index,
            Fallback::DateSerial => self.date_serial,
            Fallback::NumberText => self.number_text,
            Fallback::DateText => self.date_text,
        }
    }

    fn slot(&mut self, fallback: Fallback) -> &mut usize {
        match fallback {
            Fallback::SharedStringIndex => &mut self.shared_string_index,
            Fallback::StyleIndex => &mut self.style_index,
            Fallback::DateSerial => &mut self.date_serial,
            Fallback::NumberText => &mut self.number_text,
            Fallback::DateText => &mut self.date_text,
        }
    }

    pub fn total(&self) -> usize {
        Fallback::ALL.iter().map(|f| self.get(*f)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Summary of one sheet read, returned next to the grid
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReadReport {
    pub sheet_name: String,
    pub row_count: usize,
    pub cell_count: usize,
    pub fallbacks: FallbackCounts,
}

impl ReadReport {
    /// One-line summary, e.g. `12 rows read from sheet 'Data'`
    pub fn summary(&self) -> String {
        format!("{} rows read from sheet '{}'", self.row_count, self.sheet_name)
    }
}

impl fmt::Display for ReadReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} cells", self.summary(), self.cell_count)?;
        if !self.fallbacks.is_empty() {
            let parts: Vec<String> = Fallback::ALL
                .iter()
                .filter(|fb| self.fallbacks.get(**fb) > 0)
                .map(|fb| format!("{}: {}", fb, self.fallbacks.get(*fb)))
                .collect();
            write!(f, "; {}", parts.join(", "))?;
        }
        write!(f, ")")
    }
}
