//! Terminal rendering of the pages

use std::fmt::Write;

use colored::Colorize;
use openapi_client::models::{ContainerStats, Deployment, EnvVar};

use crate::pages::deployment::DeploymentView;
use crate::utils::{format_mb, format_percent};

/// The deployment cards of the dashboard
pub fn render_deployment_list(user_id: &str, deployments: &[Deployment]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", format!("{}'s Dashboard", user_id).bold());

    if deployments.is_empty() {
        let _ = writeln!(out, "No deployments found");
        let _ = writeln!(out, "{}", "Create your first deployment with `shipdeck deploy`".dimmed());
        return out;
    }

    for deployment in deployments {
        let _ = writeln!(
            out,
            "{}  {}  {}  {}",
            deployment.id.dimmed(),
            deployment.repo_name.bold(),
            deployment.sub_domain.cyan(),
            format!("Branch: {}", deployment.branch),
        );
    }

    out
}

/// The container status bar
pub fn render_stats(stats: &ContainerStats) -> String {
    let status = if stats.is_running() {
        stats.status.green()
    } else {
        stats.status.red()
    };

    let mut out = String::new();
    let _ = writeln!(out, "{}", "Container Status".bold());
    let _ = writeln!(out, "  STATUS     {}", status);
    let _ = writeln!(out, "  CPU USAGE  {}", format_percent(stats.cpu_usage));
    let _ = writeln!(
        out,
        "  MEMORY     {} / {}",
        format_mb(stats.memory_usage),
        format_mb(stats.memory_limit)
    );
    let _ = writeln!(
        out,
        "  NETWORK    ↓ {}  ↑ {}",
        format_mb(stats.network_rx),
        format_mb(stats.network_tx)
    );
    out
}

/// Environment variables as `KEY = value` lines
pub fn render_env(env: &[EnvVar]) -> String {
    if env.is_empty() {
        return format!("{}\n", "No environment variables".italic());
    }

    env.iter()
        .map(|var| format!("  {} = {}\n", var.key.bold(), var.value))
        .collect()
}

/// Container log lines
pub fn render_logs(logs: &[String]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", "Container Logs".bold());
    if logs.is_empty() {
        let _ = writeln!(out, "{}", "No logs available".dimmed());
    }
    for line in logs {
        let _ = writeln!(out, "{}", line.green());
    }
    out
}

/// The whole deployment detail page
pub fn render_deployment_page(view: &DeploymentView, domain: &str) -> String {
    if let Some(error) = &view.error {
        return format!("{}\n", error.red());
    }

    let mut out = String::new();

    if let Some(stats) = &view.stats {
        out.push_str(&render_stats(stats));
        out.push('\n');
    }

    if let Some(deployment) = &view.deployment {
        let _ = writeln!(out, "{}", deployment.repo_name.bold().underline());
        let _ = writeln!(out, "  Repository    {}", deployment.clone_url);
        let _ = writeln!(out, "  Branch        {}", deployment.branch);
        let _ = writeln!(out, "  Port          {}", deployment.port);
        let _ = writeln!(out, "  Subdomain     {}", deployment.sub_domain);
        let _ = writeln!(out, "  Project Type  {}", deployment.project_type);
        let _ = writeln!(
            out,
            "  Site          {}",
            format!("http://{}.{}", deployment.sub_domain, domain).cyan()
        );
        out.push('\n');
    }

    let _ = writeln!(out, "{}", "Environment Variables".bold());
    if let Some(env_error) = &view.env_error {
        let _ = writeln!(out, "{}", env_error.red());
    }
    out.push_str(&render_env(&view.env));

    if view.redeploying {
        let _ = writeln!(out, "\n{}", "Redeploying application".yellow());
    }

    if let Some(logs) = &view.logs {
        out.push('\n');
        out.push_str(&render_logs(logs));
    }

    out
}
