use std::thread;
use std::time::{Duration, Instant};

use board_core::{
    notice::{MessageArea, Notice, NoticeSeverity},
    projection::{project, ViewFilter},
    settings::load_settings,
    BoardClient, BoardEvent, BoardSnapshot, CommandKind, LOAD_FAILURE_TEXT, NO_ACTIVITIES_TEXT,
};
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use eframe::egui;
use shared::domain::{Activity, SortKey};
use url::Url;

enum BackendCommand {
    RefreshCatalog,
    SignUp { activity: String, email: String },
    Unregister { activity: String, email: String },
}

enum UiEvent {
    Info(String),
    StartupFailed(String),
    Catalog(BoardSnapshot),
    CatalogLoadFailed { reason: String },
    CommandCompleted { kind: CommandKind, message: String },
    CommandFailed { message: String },
}

fn queue_command(cmd_tx: &Sender<BackendCommand>, cmd: BackendCommand, status: &mut String) {
    let cmd_name = match &cmd {
        BackendCommand::RefreshCatalog => "refresh_catalog",
        BackendCommand::SignUp { .. } => "sign_up",
        BackendCommand::Unregister { .. } => "unregister",
    };
    match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(command = cmd_name, "queued ui->backend command");
        }
        Err(TrySendError::Full(_)) => {
            *status = "UI command queue is full; please retry".to_string();
            tracing::warn!(command = cmd_name, "ui->backend command queue is full");
        }
        Err(TrySendError::Disconnected(_)) => {
            *status = "Backend command processor disconnected; restart the app".to_string();
            tracing::error!(command = cmd_name, "ui->backend command queue disconnected");
        }
    }
}

fn sort_label(sort: SortKey) -> &'static str {
    match sort {
        SortKey::Name => "Sort by Name",
        SortKey::Time => "Sort by Time",
    }
}

struct BoardGuiApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    snapshot: BoardSnapshot,
    filter: ViewFilter,
    signup_activity: String,
    signup_email: String,
    message_area: MessageArea,
    status: String,
}

impl BoardGuiApp {
    fn new(cmd_tx: Sender<BackendCommand>, ui_rx: Receiver<UiEvent>) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            snapshot: BoardSnapshot::default(),
            filter: ViewFilter::default(),
            signup_activity: String::new(),
            signup_email: String::new(),
            message_area: MessageArea::default(),
            status: "Starting backend worker...".to_string(),
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => {
                    self.status = message;
                }
                UiEvent::StartupFailed(message) => {
                    self.snapshot.load_failed = true;
                    self.status = message;
                }
                UiEvent::Catalog(snapshot) => {
                    self.status = format!("{} activities loaded", snapshot.catalog.len());
                    self.snapshot = snapshot;
                }
                UiEvent::CatalogLoadFailed { reason } => {
                    self.snapshot.load_failed = true;
                    self.status = format!("Catalog refresh failed: {reason}");
                }
                UiEvent::CommandCompleted { kind, message } => {
                    self.message_area.show(Notice::success(message), Instant::now());
                    if kind == CommandKind::SignUp {
                        self.signup_activity.clear();
                        self.signup_email.clear();
                    }
                }
                UiEvent::CommandFailed { message } => {
                    self.message_area.show(Notice::error(message), Instant::now());
                }
            }
        }
    }

    fn show_toolbar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("board_toolbar").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                let category_text = if self.filter.category.is_empty() {
                    "All Categories".to_string()
                } else {
                    self.filter.category.clone()
                };
                egui::ComboBox::from_id_salt("category_filter")
                    .selected_text(category_text)
                    .show_ui(ui, |ui| {
                        ui.selectable_value(
                            &mut self.filter.category,
                            String::new(),
                            "All Categories",
                        );
                        for category in &self.snapshot.categories {
                            ui.selectable_value(
                                &mut self.filter.category,
                                category.clone(),
                                category,
                            );
                        }
                    });

                egui::ComboBox::from_id_salt("sort_filter")
                    .selected_text(sort_label(self.filter.sort))
                    .show_ui(ui, |ui| {
                        ui.selectable_value(
                            &mut self.filter.sort,
                            SortKey::Name,
                            sort_label(SortKey::Name),
                        );
                        ui.selectable_value(
                            &mut self.filter.sort,
                            SortKey::Time,
                            sort_label(SortKey::Time),
                        );
                    });

                ui.add(
                    egui::TextEdit::singleline(&mut self.filter.search)
                        .id_salt("search_filter")
                        .hint_text("Search activities...")
                        .desired_width(220.0),
                );

                if ui.button("Refresh").clicked() {
                    queue_command(
                        &self.cmd_tx,
                        BackendCommand::RefreshCatalog,
                        &mut self.status,
                    );
                }
            });
            ui.add_space(4.0);
        });
    }

    fn show_board(&mut self, ctx: &egui::Context, entries: &[(String, Activity)]) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Activities");
            ui.add_space(6.0);

            if self.snapshot.load_failed {
                ui.label(LOAD_FAILURE_TEXT);
                return;
            }
            if entries.is_empty() {
                ui.label(NO_ACTIVITIES_TEXT);
                return;
            }

            egui::ScrollArea::vertical().show(ui, |ui| {
                for (name, activity) in entries {
                    self.show_activity_card(ui, name, activity);
                    ui.add_space(8.0);
                }
            });
        });
    }

    fn show_activity_card(&mut self, ui: &mut egui::Ui, name: &str, activity: &Activity) {
        egui::Frame::new()
            .stroke(egui::Stroke::new(
                1.0,
                ui.visuals().widgets.noninteractive.bg_stroke.color,
            ))
            .corner_radius(8.0)
            .inner_margin(egui::Margin::symmetric(10, 8))
            .show(ui, |ui| {
                ui.heading(name);
                ui.label(&activity.description);
                ui.label(format!("Schedule: {}", activity.schedule));
                ui.label(format!("Max Participants: {}", activity.max_participants));
                ui.label(format!("Category: {}", activity.category_label()));
                if activity.participants.is_empty() {
                    ui.weak("No participants yet");
                } else {
                    ui.label(egui::RichText::new("Participants:").strong());
                    for email in &activity.participants {
                        ui.horizontal(|ui| {
                            ui.label(email);
                            if ui.button("❌").clicked() {
                                queue_command(
                                    &self.cmd_tx,
                                    BackendCommand::Unregister {
                                        activity: name.to_string(),
                                        email: email.clone(),
                                    },
                                    &mut self.status,
                                );
                            }
                        });
                    }
                }
            });
    }

    fn show_signup_panel(&mut self, ctx: &egui::Context, entries: &[(String, Activity)]) {
        egui::TopBottomPanel::bottom("signup_panel").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.label(egui::RichText::new("Sign Up for an Activity").strong());
            ui.horizontal(|ui| {
                let selected = if self.signup_activity.is_empty() {
                    "-- Select an activity --".to_string()
                } else {
                    self.signup_activity.clone()
                };
                egui::ComboBox::from_id_salt("signup_activity")
                    .selected_text(selected)
                    .show_ui(ui, |ui| {
                        for (name, _) in entries {
                            ui.selectable_value(&mut self.signup_activity, name.clone(), name);
                        }
                    });

                ui.add(
                    egui::TextEdit::singleline(&mut self.signup_email)
                        .id_salt("signup_email")
                        .hint_text("your-email@mergington.edu")
                        .desired_width(220.0),
                );

                let can_submit =
                    !self.signup_activity.is_empty() && !self.signup_email.is_empty();
                if ui
                    .add_enabled(can_submit, egui::Button::new("Sign Up"))
                    .clicked()
                {
                    queue_command(
                        &self.cmd_tx,
                        BackendCommand::SignUp {
                            activity: self.signup_activity.clone(),
                            email: self.signup_email.clone(),
                        },
                        &mut self.status,
                    );
                }
            });

            self.show_message_area(ui);

            ui.separator();
            ui.small(egui::RichText::new(&self.status).weak());
            ui.add_space(4.0);
        });
    }

    fn show_message_area(&mut self, ui: &mut egui::Ui) {
        if let Some(notice) = self.message_area.visible(Instant::now()) {
            let (fill, stroke) = match notice.severity {
                NoticeSeverity::Success => (
                    egui::Color32::from_rgb(53, 111, 64),
                    egui::Stroke::new(1.0, egui::Color32::from_rgb(96, 175, 116)),
                ),
                NoticeSeverity::Error => (
                    egui::Color32::from_rgb(111, 53, 53),
                    egui::Stroke::new(1.0, egui::Color32::from_rgb(175, 96, 96)),
                ),
            };
            egui::Frame::NONE
                .fill(fill)
                .stroke(stroke)
                .corner_radius(8.0)
                .inner_margin(egui::Margin::symmetric(10, 8))
                .show(ui, |ui| {
                    ui.label(egui::RichText::new(&notice.text).color(egui::Color32::WHITE));
                });
        }
    }
}

impl eframe::App for BoardGuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        self.show_toolbar(ctx);

        // One projection drives both the card list and the signup
        // selector, so they can never disagree on what is visible.
        let entries: Vec<(String, Activity)> = project(&self.snapshot.catalog, &self.filter)
            .into_iter()
            .map(|(name, activity)| (name.to_string(), activity.clone()))
            .collect();

        self.show_signup_panel(ctx, &entries);
        self.show_board(ctx, &entries);

        ctx.request_repaint_after(Duration::from_millis(100));
    }
}

fn spawn_backend_thread(cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    thread::spawn(move || {
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker starting...".to_string()));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::StartupFailed(format!(
                    "backend worker startup failure: failed to build runtime: {err}"
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let settings = load_settings();
            let server_url = match Url::parse(&settings.server_url) {
                Ok(url) => url,
                Err(err) => {
                    let _ = ui_tx.try_send(UiEvent::StartupFailed(format!(
                        "backend worker startup failure: invalid server url '{}': {err}",
                        settings.server_url
                    )));
                    tracing::error!("invalid server url '{}': {err}", settings.server_url);
                    return;
                }
            };

            let client = BoardClient::new(server_url);
            let _ = ui_tx.try_send(UiEvent::Info("Backend worker ready".to_string()));

            let mut events = client.subscribe_events();
            let ui_tx_clone = ui_tx.clone();
            tokio::spawn(async move {
                while let Ok(event) = events.recv().await {
                    let evt = match event {
                        BoardEvent::CatalogUpdated(snapshot) => UiEvent::Catalog(snapshot),
                        BoardEvent::CatalogLoadFailed { reason } => {
                            UiEvent::CatalogLoadFailed { reason }
                        }
                    };
                    let _ = ui_tx_clone.try_send(evt);
                }
            });

            // Failures surface through the event stream.
            let _ = client.refresh_catalog().await;

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::RefreshCatalog => {
                        let _ = client.refresh_catalog().await;
                    }
                    BackendCommand::SignUp { activity, email } => {
                        match client.sign_up(&activity, &email).await {
                            Ok(receipt) => {
                                let _ = ui_tx.try_send(UiEvent::CommandCompleted {
                                    kind: CommandKind::SignUp,
                                    message: receipt.message,
                                });
                            }
                            Err(err) => {
                                let _ = ui_tx.try_send(UiEvent::CommandFailed {
                                    message: err.user_message(CommandKind::SignUp),
                                });
                            }
                        }
                    }
                    BackendCommand::Unregister { activity, email } => {
                        match client.unregister(&activity, &email).await {
                            Ok(receipt) => {
                                let _ = ui_tx.try_send(UiEvent::CommandCompleted {
                                    kind: CommandKind::Unregister,
                                    message: receipt.message,
                                });
                            }
                            Err(err) => {
                                let _ = ui_tx.try_send(UiEvent::CommandFailed {
                                    message: err.user_message(CommandKind::Unregister),
                                });
                            }
                        }
                    }
                }
            }
        });
    });
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);
    spawn_backend_thread(cmd_rx, ui_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Activity Board")
            .with_inner_size([1060.0, 760.0])
            .with_min_inner_size([820.0, 560.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Activity Board",
        options,
        Box::new(|_cc| Ok(Box::new(BoardGuiApp::new(cmd_tx, ui_rx)))),
    )
}

#[cfg(test)]
mod tests {
    use super::{queue_command, BackendCommand, BoardGuiApp, UiEvent};
    use board_core::notice::NoticeSeverity;
    use board_core::{BoardSnapshot, CommandKind};
    use crossbeam_channel::bounded;
    use shared::domain::{Activity, ActivityCatalog};

    fn app_with_channels() -> (BoardGuiApp, crossbeam_channel::Sender<UiEvent>) {
        let (cmd_tx, _cmd_rx) = bounded::<BackendCommand>(4);
        let (ui_tx, ui_rx) = bounded::<UiEvent>(4);
        std::mem::forget(_cmd_rx);
        (BoardGuiApp::new(cmd_tx, ui_rx), ui_tx)
    }

    #[test]
    fn queue_command_reports_full_queue_in_status() {
        let (cmd_tx, _cmd_rx) = bounded::<BackendCommand>(1);
        let mut status = String::new();

        queue_command(&cmd_tx, BackendCommand::RefreshCatalog, &mut status);
        assert!(status.is_empty());

        queue_command(&cmd_tx, BackendCommand::RefreshCatalog, &mut status);
        assert!(status.contains("full"));
    }

    #[test]
    fn queue_command_reports_disconnected_backend_in_status() {
        let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(1);
        drop(cmd_rx);
        let mut status = String::new();

        queue_command(&cmd_tx, BackendCommand::RefreshCatalog, &mut status);
        assert!(status.contains("disconnected"));
    }

    #[test]
    fn signup_success_clears_the_form_and_unregister_does_not() {
        let (mut app, ui_tx) = app_with_channels();
        app.signup_activity = "Chess Club".to_string();
        app.signup_email = "michael@mergington.edu".to_string();

        ui_tx
            .send(UiEvent::CommandCompleted {
                kind: CommandKind::SignUp,
                message: "Signed up michael@mergington.edu for Chess Club".to_string(),
            })
            .expect("send");
        app.process_ui_events();
        assert!(app.signup_activity.is_empty());
        assert!(app.signup_email.is_empty());
        assert!(app.message_area.visible(std::time::Instant::now()).is_some());

        app.signup_activity = "Chess Club".to_string();
        app.signup_email = "michael@mergington.edu".to_string();
        ui_tx
            .send(UiEvent::CommandCompleted {
                kind: CommandKind::Unregister,
                message: "Unregistered michael@mergington.edu from Chess Club".to_string(),
            })
            .expect("send");
        app.process_ui_events();
        assert_eq!(app.signup_activity, "Chess Club");
        assert_eq!(app.signup_email, "michael@mergington.edu");
    }

    #[test]
    fn signup_failure_keeps_the_form_contents() {
        let (mut app, ui_tx) = app_with_channels();
        app.signup_activity = "Chess Club".to_string();
        app.signup_email = "michael@mergington.edu".to_string();

        ui_tx
            .send(UiEvent::CommandFailed {
                message: "Already signed up for this activity".to_string(),
            })
            .expect("send");
        app.process_ui_events();

        assert_eq!(app.signup_activity, "Chess Club");
        assert_eq!(app.signup_email, "michael@mergington.edu");
        let notice = app
            .message_area
            .visible(std::time::Instant::now())
            .expect("failure notice should be on screen");
        assert_eq!(notice.severity, NoticeSeverity::Error);
        assert_eq!(notice.text, "Already signed up for this activity");
    }

    #[test]
    fn catalog_load_failure_keeps_last_snapshot_visible() {
        let (mut app, ui_tx) = app_with_channels();

        let mut catalog = ActivityCatalog::new();
        catalog.insert(
            "Chess Club".to_string(),
            Activity {
                description: "Tournament play".to_string(),
                schedule: "Fridays, 3:30 PM - 5:00 PM".to_string(),
                max_participants: 12,
                category: Some("Games".to_string()),
                participants: vec!["michael@mergington.edu".to_string()],
            },
        );
        ui_tx
            .send(UiEvent::Catalog(BoardSnapshot {
                catalog,
                categories: vec!["Games".to_string()],
                load_failed: false,
            }))
            .expect("send");
        app.process_ui_events();
        assert_eq!(app.snapshot.catalog.len(), 1);
        assert!(!app.snapshot.load_failed);

        ui_tx
            .send(UiEvent::CatalogLoadFailed {
                reason: "connection refused".to_string(),
            })
            .expect("send");
        app.process_ui_events();
        assert!(app.snapshot.load_failed);
        assert_eq!(app.snapshot.catalog.len(), 1);
    }
}
