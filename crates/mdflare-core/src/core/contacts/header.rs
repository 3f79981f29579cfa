use super::itype::InteractionType;
use itertools::Itertools;
use std::fmt;

/// Run metadata written as the first comment line of a contact file.
///
/// `# total_frames:N beg:B end:E stride:S interaction_types:t1,t2`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactFileHeader {
    pub total_frames: usize,
    pub begin: usize,
    pub end: usize,
    pub stride: usize,
    pub interaction_types: Vec<InteractionType>,
}

impl ContactFileHeader {
    /// Recognises a header comment. Returns `None` for ordinary comments.
    pub fn parse(line: &str) -> Option<Self> {
        let body = line.trim().strip_prefix('#')?.trim();
        let mut total_frames = None;
        let mut begin = None;
        let mut end = None;
        let mut stride = None;
        let mut interaction_types = Vec::new();

        for field in body.split_whitespace() {
            let (key, value) = field.split_once(':')?;
            match key {
                "total_frames" => total_frames = value.parse().ok(),
                "beg" => begin = value.parse().ok(),
                "end" => end = value.parse().ok(),
                "stride" => stride = value.parse().ok(),
                "interaction_types" => {
                    interaction_types = value
                        .split(',')
                        .filter(|tag| !tag.is_empty())
                        .map(InteractionType::from_tag)
                        .collect::<Option<Vec<_>>>()?;
                }
                _ => {}
            }
        }

        Some(Self {
            total_frames: total_frames?,
            begin: begin?,
            end: end?,
            stride: stride?,
            interaction_types,
        })
    }
}

impl fmt::Display for ContactFileHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "# total_frames:{} beg:{} end:{} stride:{} interaction_types:{}",
            self.total_frames,
            self.begin,
            self.end,
            self.stride,
            self.interaction_types.iter().join(",")
        )
    }
}
