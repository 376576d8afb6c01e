use super::ranges::parse_indices;
use crate::error::{CsaSelectError, Result};
use crate::tree::{Patient, Series, Study, Tree};
use crate::types::{format_date, format_id, format_time};
use log::debug;
use std::io::{self, BufRead, Write};

/// What the user typed at a prompt
enum Reply {
    /// A token starting with a digit
    Token(String),
    /// A non-numeric token, or end of input
    Abort,
}

/// Outcome of one answer at the series prompt
enum SeriesInput<'t> {
    Valid(Vec<&'t Series>),
    Retry,
    Abort,
}

/// Interactive patient → study → series selection over line-oriented text
///
/// Any level with a single child is chosen without prompting. Patients and
/// studies are picked by 1-based number; series by a list of 0-based
/// numbers and ranges (see [`parse_indices`]). A reply that does not start
/// with a digit aborts and yields an empty selection.
///
/// # Example
///
/// ```
/// use csaselect_core::selection::Selector;
/// use csaselect_core::tree::{Patient, Series, Study, Tree};
///
/// let mut study = Study::new("brain", "1", "20140312", "101500");
/// for (name, number) in [("t1", 1), ("t2", 2), ("dwi", 3)] {
///     study.series.push(Series::new(name, number, "MR"));
/// }
/// let mut patient = Patient::new("Doe^John", "42", "19800101");
/// patient.studies.push(study);
/// let tree = Tree { patients: vec![patient] };
///
/// let mut selector = Selector::new("2,0\n".as_bytes(), Vec::new());
/// let chosen = selector.select(&tree).unwrap();
/// let names: Vec<_> = chosen.iter().map(|s| s.name.as_str()).collect();
/// assert_eq!(names, vec!["dwi", "t1"]);
/// ```
pub struct Selector<R, W> {
    input: R,
    prompt: W,
}

impl<R: BufRead, W: Write> Selector<R, W> {
    /// Creates a selector reading replies from `input` and writing prompts to `prompt`
    pub fn new(input: R, prompt: W) -> Self {
        Self { input, prompt }
    }

    /// Hands back the input and prompt channels
    pub fn into_inner(self) -> (R, W) {
        (self.input, self.prompt)
    }

    /// Walks the tree and returns the chosen series, in the order given
    ///
    /// An empty result means the user aborted.
    ///
    /// # Errors
    ///
    /// Returns an error without prompting if the tree, or any patient or
    /// study in it, has no children. Failures writing prompts or reading
    /// replies are also returned.
    pub fn select<'t>(&mut self, tree: &'t Tree) -> Result<Vec<&'t Series>> {
        check_tree(tree)?;

        let patient = match self.choose_patient(tree)? {
            Some(patient) => patient,
            None => return Ok(Vec::new()),
        };
        let study = match self.choose_study(patient)? {
            Some(study) => study,
            None => return Ok(Vec::new()),
        };
        self.choose_series(study)
    }

    fn choose_patient<'t>(&mut self, tree: &'t Tree) -> Result<Option<&'t Patient>> {
        if tree.patients.len() == 1 {
            return Ok(tree.patients.first());
        }

        let lines: Vec<_> = tree
            .patients
            .iter()
            .enumerate()
            .map(|(i, patient)| format!("  {:2} - {}", i + 1, describe_patient(patient)))
            .collect();

        let chosen = self
            .choose_one("Select patient (q to abort):", &lines)?
            .map(|i| &tree.patients[i]);
        if let Some(patient) = chosen {
            writeln!(self.prompt, "patient: {}", describe_patient(patient))?;
        }
        Ok(chosen)
    }

    fn choose_study<'t>(&mut self, patient: &'t Patient) -> Result<Option<&'t Study>> {
        if patient.studies.len() == 1 {
            return Ok(patient.studies.first());
        }

        let lines: Vec<_> = patient
            .studies
            .iter()
            .enumerate()
            .map(|(i, study)| format!("  {:4} - {}", i + 1, describe_study(study)))
            .collect();

        let chosen = self
            .choose_one("Select study (q to abort):", &lines)?
            .map(|i| &patient.studies[i]);
        if let Some(study) = chosen {
            writeln!(self.prompt, "study: {}", describe_study(study))?;
        }
        Ok(chosen)
    }

    fn choose_series<'t>(&mut self, study: &'t Study) -> Result<Vec<&'t Series>> {
        if study.series.len() == 1 {
            return Ok(study.series.iter().collect());
        }

        loop {
            writeln!(self.prompt, "Select series ('q' to abort):")?;
            for (i, series) in study.series.iter().enumerate() {
                writeln!(self.prompt, "  {:2} - {}", i, describe_series(series))?;
            }

            let input = match self.read_reply()? {
                Reply::Token(token) => self.interpret_series(&token, study)?,
                Reply::Abort => SeriesInput::Abort,
            };
            match input {
                SeriesInput::Valid(chosen) => return Ok(chosen),
                SeriesInput::Abort => return Ok(Vec::new()),
                SeriesInput::Retry => continue,
            }
        }
    }

    /// Maps a series-level answer to the chosen series, or asks for a retry
    ///
    /// The whole list is rejected if any index is out of range.
    fn interpret_series<'t>(&mut self, token: &str, study: &'t Study) -> Result<SeriesInput<'t>> {
        let indices = match parse_indices(token, study.series.len()) {
            Ok(indices) => indices,
            Err(e) => {
                debug!("{}", e);
                writeln!(self.prompt, "Invalid number sequence - please try again")?;
                return Ok(SeriesInput::Retry);
            }
        };

        let chosen = indices.and_then(|indices| {
            indices
                .into_iter()
                .map(|i| study.series.get(i))
                .collect::<Option<Vec<_>>>()
        });
        match chosen {
            Some(chosen) if !chosen.is_empty() => Ok(SeriesInput::Valid(chosen)),
            _ => {
                writeln!(self.prompt, "invalid selection - try again")?;
                Ok(SeriesInput::Retry)
            }
        }
    }

    /// Prompts until a 1-based number within `lines` is given
    fn choose_one(&mut self, header: &str, lines: &[String]) -> Result<Option<usize>> {
        loop {
            writeln!(self.prompt, "{}", header)?;
            for line in lines {
                writeln!(self.prompt, "{}", line)?;
            }

            let token = match self.read_reply()? {
                Reply::Token(token) => token,
                Reply::Abort => return Ok(None),
            };
            match token.parse::<usize>() {
                Ok(n) if n >= 1 && n <= lines.len() => return Ok(Some(n - 1)),
                _ => writeln!(self.prompt, "invalid selection - try again")?,
            }
        }
    }

    /// Prints the `? ` prompt and reads the first token of the next non-blank line
    fn read_reply(&mut self) -> io::Result<Reply> {
        write!(self.prompt, "? ")?;
        self.prompt.flush()?;

        let mut line = String::new();
        loop {
            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                return Ok(Reply::Abort);
            }
            if let Some(token) = line.split_whitespace().next() {
                return Ok(if token.starts_with(|c: char| c.is_ascii_digit()) {
                    Reply::Token(token.to_string())
                } else {
                    Reply::Abort
                });
            }
        }
    }
}

/// Runs the selector on standard input, prompting on standard error
pub fn select_cmdline(tree: &Tree) -> Result<Vec<&Series>> {
    let stdin = io::stdin();
    let mut selector = Selector::new(stdin.lock(), io::stderr());
    selector.select(tree)
}

fn check_tree(tree: &Tree) -> Result<()> {
    if tree.is_empty() {
        return Err(CsaSelectError::EmptyTree);
    }
    for patient in &tree.patients {
        if patient.is_empty() {
            return Err(CsaSelectError::EmptyLevel(format!(
                "patient {}",
                describe_patient(patient)
            )));
        }
        for study in &patient.studies {
            if study.is_empty() {
                return Err(CsaSelectError::EmptyLevel(format!(
                    "study {}",
                    describe_study(study)
                )));
            }
        }
    }
    Ok(())
}

fn or_unnamed(name: &str) -> &str {
    if name.is_empty() {
        "unnamed"
    } else {
        name
    }
}

fn describe_patient(patient: &Patient) -> String {
    format!(
        "{} {} {}",
        patient.name,
        format_id(&patient.id),
        format_date(&patient.dob)
    )
}

fn describe_study(study: &Study) -> String {
    format!(
        "{} {} {} {}",
        or_unnamed(&study.name),
        format_id(&study.id),
        format_date(&study.date),
        format_time(&study.time)
    )
}

fn describe_series(series: &Series) -> String {
    format!(
        "{:4} {} images {:>8} {} ({}) [{}]",
        series.len(),
        series.modality,
        format_time(&series.time),
        or_unnamed(&series.name),
        series.sequence_name().unwrap_or("?"),
        series.number
    )
}
