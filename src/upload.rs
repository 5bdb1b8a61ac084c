use crate::error::{AppError, AppResult};

/// Largest report the panel accepts
pub const MAX_REPORT_BYTES: u64 = 10 * 1024 * 1024;

/// How long the stand-in analysis takes
pub const ANALYSIS_DELAY_MS: u32 = 1500;

const ACCEPTED: &[(&str, &str)] = &[
    ("pdf", "application/pdf"),
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("csv", "text/csv"),
    ("json", "application/json"),
];

/// Value for the file input's `accept` attribute
pub fn accept_attribute() -> String {
    ACCEPTED
        .iter()
        .map(|(ext, _)| format!(".{ext}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// What the panel knows about a picked file
#[derive(Debug, Clone, PartialEq)]
pub struct ReportFile {
    pub name: String,
    pub size: u64,
    pub mime: String,
}

impl ReportFile {
    pub fn new(name: impl Into<String>, size: u64, mime: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size,
            mime: mime.into(),
        }
    }

    fn extension(&self) -> Option<String> {
        self.name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
    }

    /// Accept by MIME type, or by extension when the browser reports none
    pub fn validate(&self) -> AppResult<()> {
        if self.size == 0 {
            return Err(AppError::InvalidReport(format!("{} is empty", self.name)));
        }
        if self.size > MAX_REPORT_BYTES {
            return Err(AppError::InvalidReport(format!(
                "{} is {}, the limit is {}",
                self.name,
                format_size(self.size),
                format_size(MAX_REPORT_BYTES)
            )));
        }

        let known_mime = ACCEPTED.iter().any(|(_, mime)| *mime == self.mime);
        let known_ext = self
            .extension()
            .is_some_and(|ext| ACCEPTED.iter().any(|(e, _)| *e == ext));
        if known_mime || (self.mime.is_empty() && known_ext) {
            Ok(())
        } else {
            Err(AppError::InvalidReport(format!(
                "{} is not a PDF, image, CSV or JSON report",
                self.name
            )))
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum UploadState {
    Empty,
    Selected(ReportFile),
    Analyzing(ReportFile),
    Complete { file: ReportFile, summary: String },
}

/// Panel model: current state plus the last rejection message
#[derive(Debug, Clone, PartialEq)]
pub struct UploadModel {
    pub state: UploadState,
    pub rejection: Option<String>,
}

impl Default for UploadModel {
    fn default() -> Self {
        Self {
            state: UploadState::Empty,
            rejection: None,
        }
    }
}

impl UploadModel {
    /// Offer a file. Rejected files leave the current selection alone.
    /// Nothing can be picked while an analysis is running.
    pub fn select(&mut self, file: ReportFile) -> AppResult<()> {
        if matches!(self.state, UploadState::Analyzing(_)) {
            return Ok(());
        }
        match file.validate() {
            Ok(()) => {
                self.state = UploadState::Selected(file);
                self.rejection = None;
                Ok(())
            }
            Err(e) => {
                self.rejection = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Move a selected file into analysis; returns false if there is none
    pub fn begin_analysis(&mut self) -> bool {
        match &self.state {
            UploadState::Selected(file) => {
                self.state = UploadState::Analyzing(file.clone());
                true
            }
            _ => false,
        }
    }

    pub fn finish_analysis(&mut self) {
        if let UploadState::Analyzing(file) = &self.state {
            let summary = format!(
                "{} ({}) was received. Detailed insights will appear here once the analysis service is connected.",
                file.name,
                format_size(file.size)
            );
            self.state = UploadState::Complete {
                file: file.clone(),
                summary,
            };
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Human readable byte count, e.g. `2.5 MB`
pub fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    let b = bytes as f64;
    if b < KB {
        format!("{bytes} B")
    } else if b < KB * KB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{:.1} MB", b / (KB * KB))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pdf() -> ReportFile {
        ReportFile::new("bloodwork.pdf", 48_000, "application/pdf")
    }

    #[test]
    fn test_accepts_known_types() {
        assert!(pdf().validate().is_ok());
        assert!(ReportFile::new("scan.JPG", 10, "").validate().is_ok());
        assert!(ReportFile::new("labs.csv", 10, "text/csv").validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_files() {
        assert!(ReportFile::new("notes.docx", 10, "application/msword").validate().is_err());
        assert!(ReportFile::new("empty.pdf", 0, "application/pdf").validate().is_err());
        assert!(ReportFile::new("huge.pdf", MAX_REPORT_BYTES + 1, "application/pdf")
            .validate()
            .is_err());
    }

    #[test]
    fn test_rejection_keeps_selection() {
        let mut model = UploadModel::default();
        model.select(pdf()).unwrap();

        assert!(model.select(ReportFile::new("x.exe", 5, "")).is_err());
        assert_eq!(model.state, UploadState::Selected(pdf()));
        assert!(model.rejection.is_some());
    }

    #[test]
    fn test_analysis_lifecycle() {
        let mut model = UploadModel::default();
        assert!(!model.begin_analysis());

        model.select(pdf()).unwrap();
        assert!(model.begin_analysis());
        assert_eq!(model.state, UploadState::Analyzing(pdf()));

        // picking another file mid-analysis is ignored
        model.select(ReportFile::new("other.png", 5, "image/png")).unwrap();
        assert_eq!(model.state, UploadState::Analyzing(pdf()));

        model.finish_analysis();
        match &model.state {
            UploadState::Complete { file, summary } => {
                assert_eq!(file, &pdf());
                assert!(summary.contains("bloodwork.pdf"));
            }
            other => panic!("Expected Complete, got {other:?}"),
        }

        model.clear();
        assert_eq!(model, UploadModel::default());
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(MAX_REPORT_BYTES), "10.0 MB");
    }

    #[test]
    fn test_accept_attribute() {
        assert_eq!(accept_attribute(), ".pdf,.png,.jpg,.jpeg,.csv,.json");
    }
}
