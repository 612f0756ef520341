use indicatif::{ProgressBar, ProgressStyle};

/// Console progress bar in the house style; falls back to the default bar if the
/// template is rejected.
pub fn progress_bar(len: usize, unit: &str) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    let template = format!(
        "{{spinner:.green}} [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{pos}}/{{len}} {}",
        unit
    );
    let style = ProgressStyle::default_bar()
        .template(&template)
        .map(|style| style.progress_chars("#>-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    pb.set_style(style);
    pb
}
