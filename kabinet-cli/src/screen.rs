//! Text rendering of the profile screen: summary card, detail card and
//! the notification toggles.

use kabinet_client::ProfileViewModel;
use kabinet_client::profile::format_date;
use kabinet_model::Gender;

use crate::config::NotificationPrefs;

fn gender_label(gender: Option<Gender>) -> &'static str {
    match gender {
        Some(Gender::Male) => "Мужской",
        Some(Gender::Female) => "Женский",
        Some(Gender::Other) => "Другой",
        None => "—",
    }
}

fn or_dash(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => "—",
    }
}

fn date_or_dash(iso: Option<String>) -> String {
    let formatted = format_date(iso.as_deref());
    if formatted.is_empty() {
        "—".to_string()
    } else {
        formatted
    }
}

/// Print the profile cards the way the web screen lays them out.
pub fn render_profile(
    vm: &ProfileViewModel,
    notifications: &NotificationPrefs,
) {
    println!();
    println!("  [{}]  {}", vm.initials(), vm.full_name());
    println!();

    if let Some(user) = vm.user() {
        println!("  Email:            {}", user.email);
        println!("  Телефон:          {}", or_dash(user.phone.as_deref()));
        println!(
            "  Статус:           {}",
            if user.is_active { "Активен" } else { "Заблокирован" }
        );
        println!(
            "  Зарегистрирован:  {}",
            date_or_dash(Some(user.created_at.to_rfc3339()))
        );
    }

    if let Some(profile) = vm.profile() {
        println!(
            "  Дата рождения:    {}",
            date_or_dash(profile.birth_date.map(|d| d.to_rfc3339()))
        );
        println!("  Пол:              {}", gender_label(profile.gender));
        println!(
            "  Аватар:           {}",
            if vm.has_avatar() {
                profile.avatar.as_deref().unwrap_or("—")
            } else {
                "не загружен"
            }
        );
        if profile.deleted_at.is_some() {
            println!("  Профиль удалён (можно восстановить: kabinet profile restore)");
        }
    } else {
        println!("  Профиль ещё не заполнен");
    }

    println!();
    render_notifications(notifications);
}

/// Print the local notification toggles.
pub fn render_notifications(prefs: &NotificationPrefs) {
    fn toggle(on: bool) -> &'static str {
        if on { "вкл" } else { "выкл" }
    }

    println!("  Уведомления (локальные настройки):");
    println!("    email:       {}", toggle(prefs.email));
    println!("    sms:         {}", toggle(prefs.sms));
    println!("    push:        {}", toggle(prefs.push));
    println!("    безопасность: {}", toggle(prefs.security));
}
