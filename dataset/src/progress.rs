use indicatif::{ProgressBar, ProgressStyle};

/// Progress bar for a batch of file relocations (moves or renames).
pub struct TransferProgressBar {
    bar: ProgressBar,
}

impl TransferProgressBar {
    pub fn new(total: usize, action: &str) -> Self {
        let bar = ProgressBar::new(total as u64);
        let template = format!(
            "{{spinner:.cyan}} {} {{pos}}/{{len}} [{{wide_bar:.cyan/blue}}] {{eta_precise}} | {{msg}}",
            action
        );
        let style = ProgressStyle::default_bar()
            .template(&template)
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(style);

        Self { bar }
    }

    pub fn update(&self, file_name: &str) {
        self.bar.set_message(file_name.to_string());
        self.bar.inc(1);
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
