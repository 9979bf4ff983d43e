//! Main application: navbar with the wallet widget plus the marketplace tabs.

use std::sync::{Arc, Mutex};
use std::thread;

use eframe::egui;

use gig_node_wallet_adapters::WalletAdapterConfig;
use gig_node_wallet_core::{format_address, network_name};

use crate::api::{run_blocking, JobPost, MarketplaceClient, NewJobPost, NewUser};
use crate::state::{JobFormState, SignupFormState, PAYMENT_METHODS, PROJECT_TYPES};
use crate::ui;
use crate::wallet_bridge::WalletBridge;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    FindWork,
    PostJob,
    Signup,
    About,
}

enum JobsFetch {
    Loaded(Vec<JobPost>),
    Failed(String),
}

enum Submit {
    Done(String),
    Failed(String),
}

pub struct App {
    active_tab: Tab,
    wallet: WalletBridge,
    client: MarketplaceClient,

    jobs: Vec<JobPost>,
    jobs_loading: bool,
    jobs_error: Option<String>,
    jobs_result: Arc<Mutex<Option<JobsFetch>>>,

    job_form: JobFormState,
    job_submitting: bool,
    job_status: Option<Submit>,
    job_result: Arc<Mutex<Option<Submit>>>,

    signup_form: SignupFormState,
    signup_submitting: bool,
    signup_status: Option<Submit>,
    signup_result: Arc<Mutex<Option<Submit>>>,
}

impl App {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let config = WalletAdapterConfig::from_env();
        let client = MarketplaceClient::new(config.marketplace_base_url.clone());
        let wallet = WalletBridge::with_config(config);

        let mut app = Self {
            active_tab: Tab::FindWork,
            wallet,
            client,
            jobs: Vec::new(),
            jobs_loading: false,
            jobs_error: None,
            jobs_result: Arc::new(Mutex::new(None)),
            job_form: JobFormState::default(),
            job_submitting: false,
            job_status: None,
            job_result: Arc::new(Mutex::new(None)),
            signup_form: SignupFormState::default(),
            signup_submitting: false,
            signup_status: None,
            signup_result: Arc::new(Mutex::new(None)),
        };
        app.spawn_jobs_fetch(&cc.egui_ctx);
        app
    }

    fn spawn_jobs_fetch(&mut self, ctx: &egui::Context) {
        if self.jobs_loading {
            return;
        }
        self.jobs_loading = true;
        self.jobs_error = None;

        let client = self.client.clone();
        let slot = Arc::clone(&self.jobs_result);
        let ctx = ctx.clone();
        thread::spawn(move || {
            let outcome = match run_blocking(client.fetch_jobs()) {
                Ok(jobs) => JobsFetch::Loaded(jobs),
                Err(err) => JobsFetch::Failed(format!("{err:#}")),
            };
            if let Ok(mut guard) = slot.lock() {
                *guard = Some(outcome);
            }
            ctx.request_repaint();
        });
    }

    fn spawn_job_submit(&mut self, ctx: &egui::Context, job: NewJobPost) {
        self.job_submitting = true;
        self.job_status = None;

        let client = self.client.clone();
        let slot = Arc::clone(&self.job_result);
        let ctx = ctx.clone();
        thread::spawn(move || {
            let outcome = match run_blocking(client.create_job(&job)) {
                Ok(created) => Submit::Done(format!("Posted \"{}\"", created.title)),
                Err(err) => Submit::Failed(format!("{err:#}")),
            };
            if let Ok(mut guard) = slot.lock() {
                *guard = Some(outcome);
            }
            ctx.request_repaint();
        });
    }

    fn spawn_signup(&mut self, ctx: &egui::Context, user: NewUser) {
        self.signup_submitting = true;
        self.signup_status = None;

        let client = self.client.clone();
        let slot = Arc::clone(&self.signup_result);
        let ctx = ctx.clone();
        thread::spawn(move || {
            let outcome = match run_blocking(client.create_user(&user)) {
                Ok(created) => Submit::Done(format!("Welcome, {}", created.username)),
                Err(err) => Submit::Failed(format!("{err:#}")),
            };
            if let Ok(mut guard) = slot.lock() {
                *guard = Some(outcome);
            }
            ctx.request_repaint();
        });
    }

    /// Folds finished background work back into app state.
    fn collect_results(&mut self, ctx: &egui::Context) {
        let jobs_outcome = self
            .jobs_result
            .lock()
            .ok()
            .and_then(|mut guard| guard.take());
        if let Some(outcome) = jobs_outcome {
            self.jobs_loading = false;
            match outcome {
                JobsFetch::Loaded(jobs) => self.jobs = jobs,
                JobsFetch::Failed(message) => {
                    tracing::warn!(%message, "job fetch failed");
                    self.jobs_error = Some(message);
                }
            }
        }

        let job_outcome = self
            .job_result
            .lock()
            .ok()
            .and_then(|mut guard| guard.take());
        if let Some(outcome) = job_outcome {
            self.job_submitting = false;
            if matches!(outcome, Submit::Done(_)) {
                self.job_form.clear();
                self.spawn_jobs_fetch(ctx);
            }
            self.job_status = Some(outcome);
        }

        let signup_outcome = self
            .signup_result
            .lock()
            .ok()
            .and_then(|mut guard| guard.take());
        if let Some(outcome) = signup_outcome {
            self.signup_submitting = false;
            if matches!(outcome, Submit::Done(_)) {
                self.signup_form.clear();
            }
            self.signup_status = Some(outcome);
        }
    }

    fn navbar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("navbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Gig Node");
                ui.separator();

                for (tab, label) in [
                    (Tab::FindWork, "Find Work"),
                    (Tab::PostJob, "Post a Job"),
                    (Tab::Signup, "Sign Up"),
                    (Tab::About, "About"),
                ] {
                    if ui
                        .selectable_label(self.active_tab == tab, label)
                        .clicked()
                    {
                        self.active_tab = tab;
                    }
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    self.wallet_widget(ui);
                });
            });
        });
    }

    fn wallet_widget(&mut self, ui: &mut egui::Ui) {
        let session = self.wallet.session().clone();

        if session.is_connected() {
            if ui.button("Disconnect").clicked() {
                self.wallet.disconnect();
            }
            let address_label = ui
                .button(format_address(&session.address))
                .on_hover_text("Copy address");
            if address_label.clicked() {
                copy_to_clipboard(&session.address);
            }
            if address_label.secondary_clicked() {
                let url = ui::explorer_address_url(&session.chain_id, &session.address);
                ui::open_in_browser(&url);
            }
            if !session.balance.is_empty() {
                ui.label(format!("{} ETH", session.balance));
            }
            ui.label(network_name(&session.chain_id));
        } else {
            let label = if session.is_connecting {
                "Connecting..."
            } else {
                "Connect Wallet"
            };
            let button = ui.add_enabled(!session.is_connecting, egui::Button::new(label));
            if button.clicked() {
                self.wallet.connect();
            }
        }

        if !session.last_error.is_empty() {
            ui::error_label(ui, &session.last_error);
        }
    }

    fn find_work_tab(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        ui::section_heading(ui, "Find Work");

        ui.horizontal(|ui| {
            if ui
                .add_enabled(!self.jobs_loading, egui::Button::new("Refresh"))
                .clicked()
            {
                self.spawn_jobs_fetch(ctx);
            }
            if self.jobs_loading {
                ui.spinner();
            }
        });

        if let Some(error) = &self.jobs_error {
            ui::error_label(ui, error);
        }

        if self.jobs.is_empty() && !self.jobs_loading && self.jobs_error.is_none() {
            ui.label("No jobs posted yet.");
            return;
        }

        egui::ScrollArea::vertical().show(ui, |ui| {
            for job in &self.jobs {
                egui::Frame::group(ui.style()).show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.strong(&job.title);
                        ui.with_layout(
                            egui::Layout::right_to_left(egui::Align::Center),
                            |ui| {
                                ui.label(job.status.label());
                            },
                        );
                    });
                    ui.label(format!(
                        "{} • {} • ${:.0}",
                        job.project_type.label(),
                        job.payment_method.label(),
                        job.budget
                    ));
                    if !job.skills.is_empty() {
                        ui.label(format!("Skills: {}", job.skills.join(", ")));
                    }
                    ui.label(&job.description);
                });
                ui.add_space(4.0);
            }
        });
    }

    fn post_job_tab(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        ui::section_heading(ui, "Post a Job");

        egui::Grid::new("job_form")
            .num_columns(2)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                ui.label("Title");
                ui.text_edit_singleline(&mut self.job_form.title);
                ui.end_row();

                ui.label("Description");
                ui.text_edit_multiline(&mut self.job_form.description);
                ui.end_row();

                ui.label("Project type");
                egui::ComboBox::from_id_salt("project_type")
                    .selected_text(self.job_form.project_type.clone())
                    .show_ui(ui, |ui| {
                        for option in PROJECT_TYPES {
                            ui.selectable_value(
                                &mut self.job_form.project_type,
                                (*option).to_owned(),
                                *option,
                            );
                        }
                    });
                ui.end_row();

                ui.label("Skills (comma-separated)");
                ui.text_edit_singleline(&mut self.job_form.skills);
                ui.end_row();

                ui.label("Budget (USD)");
                ui.text_edit_singleline(&mut self.job_form.budget);
                ui.end_row();

                ui.label("Payment method");
                egui::ComboBox::from_id_salt("payment_method")
                    .selected_text(self.job_form.payment_method.clone())
                    .show_ui(ui, |ui| {
                        for option in PAYMENT_METHODS {
                            ui.selectable_value(
                                &mut self.job_form.payment_method,
                                (*option).to_owned(),
                                *option,
                            );
                        }
                    });
                ui.end_row();
            });

        ui.add_space(8.0);
        if ui
            .add_enabled(!self.job_submitting, egui::Button::new("Post Job"))
            .clicked()
        {
            match self.job_form.validate() {
                Ok(job) => self.spawn_job_submit(ctx, job),
                Err(message) => self.job_status = Some(Submit::Failed(message)),
            }
        }
        if self.job_submitting {
            ui.spinner();
        }
        match &self.job_status {
            Some(Submit::Done(message)) => {
                ui.label(message);
            }
            Some(Submit::Failed(message)) => ui::error_label(ui, message),
            None => {}
        }
    }

    fn signup_tab(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        ui::section_heading(ui, "Sign Up");

        egui::Grid::new("signup_form")
            .num_columns(2)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                ui.label("Username");
                ui.text_edit_singleline(&mut self.signup_form.username);
                ui.end_row();

                ui.label("Email");
                ui.text_edit_singleline(&mut self.signup_form.email);
                ui.end_row();

                ui.label("Password");
                ui.add(egui::TextEdit::singleline(&mut self.signup_form.password).password(true));
                ui.end_row();
            });

        ui.add_space(8.0);
        if ui
            .add_enabled(!self.signup_submitting, egui::Button::new("Create Account"))
            .clicked()
        {
            match self.signup_form.validate() {
                Ok(user) => self.spawn_signup(ctx, user),
                Err(message) => self.signup_status = Some(Submit::Failed(message)),
            }
        }
        if self.signup_submitting {
            ui.spinner();
        }
        match &self.signup_status {
            Some(Submit::Done(message)) => {
                ui.label(message);
            }
            Some(Submit::Failed(message)) => ui::error_label(ui, message),
            None => {}
        }
    }

    fn about_tab(&mut self, ui: &mut egui::Ui) {
        ui::section_heading(ui, "About");
        ui.label("Gig Node connects freelancers and clients for crypto-paid work.");
        ui.add_space(8.0);
        if !self.wallet.provider_available() {
            ui.label("No wallet provider is configured for this build.");
        }
        ui.add_space(8.0);
        ui.label(format!("Commit: {}", env!("GIT_HASH")));
        ui.label(format!("Built: {}", env!("BUILD_TIME")));
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.wallet.pump_events();
        self.collect_results(ctx);

        self.navbar(ctx);

        egui::CentralPanel::default().show(ctx, |ui| match self.active_tab {
            Tab::FindWork => self.find_work_tab(ui, ctx),
            Tab::PostJob => self.post_job_tab(ui, ctx),
            Tab::Signup => self.signup_tab(ui, ctx),
            Tab::About => self.about_tab(ui),
        });
    }
}

fn copy_to_clipboard(text: &str) {
    match arboard::Clipboard::new() {
        Ok(mut clipboard) => {
            if let Err(err) = clipboard.set_text(text.to_owned()) {
                tracing::warn!(error = %err, "clipboard write failed");
            }
        }
        Err(err) => tracing::warn!(error = %err, "clipboard unavailable"),
    }
}
