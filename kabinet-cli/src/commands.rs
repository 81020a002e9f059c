//! Command handlers: each one wires the session store, the API client and
//! the view-model together the way the web screen did.

use anyhow::{Context as _, bail};
use chrono::Utc;
use clap::ValueEnum;
use kabinet_client::{
    ApiClient, AuthApi, ProfileViewModel, SessionStore, StoredSession,
    UsersApi,
};
use kabinet_model::{Credentials, Gender};
use log::{info, warn};
use std::path::Path;

use crate::config::Config;
use crate::draft::EditDraft;
use crate::screen;

const SAVE_FALLBACK: &str = "Ошибка при сохранении данных";

/// Everything a command needs, built once per invocation.
#[derive(Debug)]
pub struct Context {
    pub config: Config,
    pub store: SessionStore,
    pub client: ApiClient,
    pub auth: AuthApi,
    pub users: UsersApi,
}

impl Context {
    /// Load the stored session (if any) and hand its token to the client
    /// at construction; nothing later reads ambient storage.
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = SessionStore::new()?;
        let client = ApiClient::new(config.server_url.clone());
        if let Some(session) = store.load() {
            info!("[cli] resuming session for {}", session.user.username);
            client.set_token(Some(session.access_token)).await;
        }
        let auth = AuthApi::new(client.clone());
        let users = UsersApi::new(client.clone());
        Ok(Self {
            config,
            store,
            client,
            auth,
            users,
        })
    }

    fn view_model(&self) -> ProfileViewModel {
        ProfileViewModel::new(self.auth.clone(), self.users.clone())
    }
}

/// Gender as a CLI argument.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum GenderArg {
    Male,
    Female,
    Other,
}

impl From<GenderArg> for Gender {
    fn from(arg: GenderArg) -> Self {
        match arg {
            GenderArg::Male => Gender::Male,
            GenderArg::Female => Gender::Female,
            GenderArg::Other => Gender::Other,
        }
    }
}

pub async fn register(
    ctx: &Context,
    email: String,
    password: String,
) -> anyhow::Result<()> {
    let response = ctx
        .auth
        .register(&Credentials { email, password })
        .await
        .context("Не удалось зарегистрироваться")?;
    start_session(ctx, response.access_token, response.user).await?;
    println!("Аккаунт создан. Вы вошли в систему.");
    Ok(())
}

pub async fn login(
    ctx: &Context,
    email: String,
    password: String,
) -> anyhow::Result<()> {
    let response = ctx
        .auth
        .login(&Credentials { email, password })
        .await
        .context("Не удалось войти")?;
    let username = response.user.username.clone();
    start_session(ctx, response.access_token, response.user).await?;
    println!("Вы вошли как {username}.");
    Ok(())
}

async fn start_session(
    ctx: &Context,
    access_token: String,
    user: kabinet_model::User,
) -> anyhow::Result<()> {
    ctx.store.save(&StoredSession {
        access_token: access_token.clone(),
        user,
        stored_at: Utc::now(),
    })?;
    ctx.client.set_token(Some(access_token)).await;
    Ok(())
}

/// The authenticated-identity read, cached under the `Auth` tag.
pub async fn whoami(ctx: &Context) -> anyhow::Result<()> {
    let user = ctx
        .auth
        .auth_profile()
        .await
        .context("Не удалось получить данные сессии")?;
    println!("{} <{}>", user.username, user.email);
    Ok(())
}

pub async fn show_profile(ctx: &Context) -> anyhow::Result<()> {
    let mut vm = ctx.view_model();
    vm.load().await;
    if vm.is_empty_failure() {
        // Analog of the full-screen error panel: nothing to render at all.
        bail!(
            "Не удалось загрузить профиль: {}",
            vm.error().unwrap_or("неизвестная ошибка")
        );
    }
    screen::render_profile(&vm, &ctx.config.notifications);
    Ok(())
}

/// Edit-flag values collected by clap.
#[derive(Debug, Default)]
pub struct EditFields {
    pub username: Option<String>,
    pub phone: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub birth_date: Option<String>,
    pub gender: Option<GenderArg>,
}

pub async fn edit_profile(
    ctx: &Context,
    fields: EditFields,
) -> anyhow::Result<()> {
    let mut vm = ctx.view_model();
    vm.load().await;

    let mut draft = EditDraft::from_state(vm.user(), vm.profile());
    if let Some(username) = fields.username {
        draft.username = username;
    }
    if let Some(phone) = fields.phone {
        draft.phone = phone;
    }
    if let Some(first_name) = fields.first_name {
        draft.first_name = first_name;
    }
    if let Some(last_name) = fields.last_name {
        draft.last_name = last_name;
    }
    if let Some(birth_date) = fields.birth_date {
        draft.birth_date = birth_date;
    }
    if let Some(gender) = fields.gender {
        draft.gender = Some(gender.into());
    }

    let profile_request = draft.profile_request()?;

    // User fields only go out when a user record is present; profile
    // fields always do. The draft is discarded on any failure.
    if vm.user().is_some() {
        if let Err(err) = vm.update_user(draft.user_request()).await {
            bail!("{}", save_error_message(&err));
        }
    }
    if let Err(err) = vm.update_profile(profile_request).await {
        bail!("{}", save_error_message(&err));
    }

    println!("Данные сохранены.");
    screen::render_profile(&vm, &ctx.config.notifications);
    Ok(())
}

/// Server message first, then the generic error display, then the fixed
/// fallback.
fn save_error_message(err: &kabinet_client::ApiError) -> String {
    if let Some(message) = err.server_message() {
        return message.to_string();
    }
    let text = err.to_string();
    if text.is_empty() {
        SAVE_FALLBACK.to_string()
    } else {
        text
    }
}

pub async fn delete_profile(ctx: &Context) -> anyhow::Result<()> {
    let mut vm = ctx.view_model();
    let message = vm.delete_profile().await?;
    println!("{}", message.message);
    Ok(())
}

pub async fn restore_profile(ctx: &Context) -> anyhow::Result<()> {
    let mut vm = ctx.view_model();
    let message = vm.restore_profile().await?;
    println!("{}", message.message);
    Ok(())
}

pub async fn upload_avatar(
    ctx: &Context,
    path: &Path,
) -> anyhow::Result<()> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Не удалось прочитать файл {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "avatar".to_string());

    let mut vm = ctx.view_model();
    let response = vm.upload_avatar(file_name, bytes).await?;
    println!("Аватар загружен: {}", response.url);
    Ok(())
}

/// Download the raw avatar image to a local file.
pub async fn download_avatar(
    ctx: &Context,
    file_id: i64,
    out: &Path,
) -> anyhow::Result<()> {
    let bytes = ctx.users.avatar_bytes(file_id).await?;
    tokio::fs::write(out, &bytes)
        .await
        .with_context(|| format!("Не удалось записать файл {}", out.display()))?;
    println!("Аватар сохранён в {} ({} байт)", out.display(), bytes.len());
    Ok(())
}

pub async fn delete_avatar(ctx: &Context, file_id: i64) -> anyhow::Result<()> {
    let mut vm = ctx.view_model();
    let message = vm.delete_avatar(file_id).await?;
    println!("{}", message.message);
    Ok(())
}

pub async fn refresh_avatar(
    ctx: &Context,
    file_id: i64,
    expiry: Option<u64>,
) -> anyhow::Result<()> {
    let mut vm = ctx.view_model();
    let response = vm.refresh_avatar_url(file_id, expiry).await?;
    println!("Новая ссылка на аватар: {}", response.url);
    Ok(())
}

/// Toggle updates collected by clap; `None` leaves a flag untouched.
#[derive(Debug, Default)]
pub struct NotifyFields {
    pub email: Option<bool>,
    pub sms: Option<bool>,
    pub push: Option<bool>,
    pub security: Option<bool>,
}

pub fn update_notifications(
    ctx: &mut Context,
    fields: NotifyFields,
) -> anyhow::Result<()> {
    let prefs = &mut ctx.config.notifications;
    if let Some(email) = fields.email {
        prefs.email = email;
    }
    if let Some(sms) = fields.sms {
        prefs.sms = sms;
    }
    if let Some(push) = fields.push {
        prefs.push = push;
    }
    if let Some(security) = fields.security {
        prefs.security = security;
    }
    ctx.config.save()?;
    screen::render_notifications(&ctx.config.notifications);
    Ok(())
}

/// End the session. Local state is cleared no matter how the server call
/// goes; a server-side failure is still reported instead of being
/// swallowed.
pub async fn logout(ctx: &Context) -> anyhow::Result<()> {
    let result = ctx.auth.logout().await;

    ctx.store.clear()?;
    ctx.client.clear_token().await;
    ctx.client.cache().clear().await;
    println!("Локальная сессия очищена.");

    match result {
        Ok(message) => {
            println!("{}", message.message);
            Ok(())
        }
        Err(err) => {
            warn!("[cli] server-side logout failed: {err}");
            bail!("Не удалось завершить сессию на сервере: {err}")
        }
    }
}
