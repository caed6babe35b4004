use crate::config::GateConfig;

fn render(template: &str, vars: &[(&str, &str)]) -> String {
    vars.iter().fold(template.to_string(), |text, (key, value)| {
        text.replace(&format!("{{{{{key}}}}}"), value)
    })
}

/// Summary shown when some authors are unsigned or have no linked account.
pub fn failure_summary(
    config: &GateConfig,
    unsigned_logins: &[String],
    orphan_committer_lines: &[String],
) -> String {
    let cla_url = config.cla_url.as_str();
    let mut items = vec![format!(
        "{}\n",
        render(&config.messages.welcome, &[("claUrl", cla_url)])
    )];

    if !unsigned_logins.is_empty() {
        let usernames = unsigned_logins.join(", ");
        items.push(format!(
            "- {}",
            render(
                &config.messages.request_known_users,
                &[("usernames", usernames.as_str()), ("claUrl", cla_url)]
            )
        ));
    }

    if !orphan_committer_lines.is_empty() {
        let emails = orphan_committer_lines.join(", ");
        items.push(format!(
            "- {}",
            render(
                &config.messages.request_unknown_users,
                &[("emails", emails.as_str()), ("claUrl", cla_url)]
            )
        ));
    }

    items.join("\n")
}

pub fn success_summary(config: &GateConfig) -> String {
    render(&config.messages.success, &[("claUrl", config.cla_url.as_str())])
}

pub fn registry_unavailable(config: &GateConfig) -> String {
    render(
        &config.messages.registry_unavailable,
        &[
            ("registry", config.registry_display_name()),
            ("claUrl", config.cla_url.as_str()),
        ],
    )
}

pub fn restart_workflow(config: &GateConfig) -> String {
    render(&config.messages.restart_workflow, &[("claUrl", config.cla_url.as_str())])
}
