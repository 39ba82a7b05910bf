use iced::widget::{button, column, container, progress_bar, row, scrollable, text, Column};
use iced::{Alignment, Element, Length, Task, Theme};
use rfd::{FileDialog, MessageButtons, MessageDialog, MessageDialogResult};
use std::path::PathBuf;

// Declare the worker and conversion modules
mod batch;
mod convert;

use batch::{BatchEvent, Operation};

/// Main application state
struct SvgConverter {
    /// Files queued for conversion, in pick order (duplicates are kept)
    svg_files: Vec<PathBuf>,
    /// The conversion stage currently running, if any
    running: Option<Operation>,
    /// Progress of the current stage, 0..=100
    progress: f32,
    /// Status message to display to the user
    status: String,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// User clicked the "Select SVG Files" button
    SelectFiles,
    /// User clicked the "Convert to EPS" button
    ConvertToEps,
    /// The background batch emitted a progress or completion event
    Batch(BatchEvent),
}

impl SvgConverter {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        (
            SvgConverter {
                svg_files: Vec::new(),
                running: None,
                progress: 0.0,
                status: String::from("Ready"),
            },
            Task::none(),
        )
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::SelectFiles => {
                // Show the native multi-select file picker
                let picked = FileDialog::new()
                    .set_title("Select SVG Files")
                    .add_filter("SVG Files", &["svg"])
                    .pick_files();

                if let Some(files) = picked {
                    // Repeated picks accumulate onto the existing list
                    self.svg_files.extend(files);
                }

                Task::none()
            }
            Message::ConvertToEps => self.start_stage(Operation::Eps),
            Message::Batch(BatchEvent::Progress(percent)) => {
                self.progress = percent as f32;
                Task::none()
            }
            Message::Batch(BatchEvent::Completed) => {
                let finished = self.running.take();
                self.progress = 100.0;

                match finished {
                    Some(Operation::Eps) => {
                        self.status = String::from("EPS conversion complete");

                        // Offer the follow-up JPG stage over the same list
                        if ask_convert_to_jpg() {
                            return self.start_stage(Operation::Jpg);
                        }
                    }
                    Some(Operation::Jpg) => {
                        self.status = String::from("JPG conversion complete");
                    }
                    None => {}
                }

                Task::none()
            }
        }
    }

    /// Kick off a conversion stage over the current file list
    fn start_stage(&mut self, op: Operation) -> Task<Message> {
        if self.svg_files.is_empty() {
            self.status = String::from("No files selected");
            return Task::none();
        }

        println!(
            "🚀 Starting {} conversion of {} files",
            op.label(),
            self.svg_files.len()
        );

        self.running = Some(op);
        self.progress = 0.0;
        self.status = format!("Converting to {}...", op.label());

        Task::run(batch::stream(self.svg_files.clone(), op), Message::Batch)
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let idle = self.running.is_none();

        let mut file_list = Column::new().spacing(4);
        for file in &self.svg_files {
            let name = file
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| file.display().to_string());
            file_list = file_list.push(text(name).size(14));
        }

        let buttons = row![
            button("Select SVG Files")
                .on_press_maybe(idle.then_some(Message::SelectFiles))
                .padding(10),
            button("Convert to EPS")
                .on_press_maybe(idle.then_some(Message::ConvertToEps))
                .padding(10),
        ]
        .spacing(20);

        let content: Column<Message> = column![
            text("Selected SVG Files:").size(16),
            scrollable(file_list).height(Length::Fill),
            buttons,
            progress_bar(0.0..=100.0, self.progress),
            text(&self.status).size(16),
        ]
        .spacing(20)
        .padding(20)
        .align_x(Alignment::Start);

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

/// Ask whether the finished EPS batch should also be converted to JPG
fn ask_convert_to_jpg() -> bool {
    let answer = MessageDialog::new()
        .set_title("Convert to JPG")
        .set_description("EPS conversion complete. Do you want to convert to JPG as well?")
        .set_buttons(MessageButtons::YesNo)
        .show();

    matches!(answer, MessageDialogResult::Yes)
}

fn main() -> iced::Result {
    iced::application(
        "SVG to EPS and JPG Converter",
        SvgConverter::update,
        SvgConverter::view,
    )
    .theme(SvgConverter::theme)
    .centered()
    .run_with(SvgConverter::new)
}
