//! Human-readable terminal renderer.

use std::path::Path;

use chrono::{DateTime, Utc};
use owo_colors::OwoColorize as _;
use studio_common::{
    App, AppMetrics, AppReport, Domain, InventoryMetrics, InventoryReport, KernelMetrics,
    ScopeFailure, SessionsOutput, SharedSpace, TerminateOutcome, TerminateStatus, UserProfile,
};

use crate::domain::StudioConfig;
use crate::output::OutputContext;

/// Renders domain types as human-readable terminal output using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

fn when(t: Option<&DateTime<Utc>>) -> String {
    t.map_or_else(|| "-".to_string(), |t| t.format("%Y-%m-%d %H:%M").to_string())
}

fn or_dash(s: Option<&str>) -> &str {
    s.unwrap_or("-")
}

/// One-line description of an app, used as a selection label.
#[must_use]
pub fn app_label(app: &App) -> String {
    format!(
        "{:<14} {:<12} {:<24} {:<16} {:<40} {}",
        app.domain_id,
        app.owner_type.to_string(),
        app.owner,
        app.app_type,
        app.app_name,
        or_dash(app.instance_type.as_deref()),
    )
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// Render the CLI version information.
    pub fn render_version(&self, version: &str) {
        println!("studioctl {version}");
    }

    /// Render the domain inventory, plus profiles and spaces when present.
    pub fn render_inventory(&self, report: &InventoryReport) {
        self.render_inventory_metrics(&report.metrics);
        println!();
        self.render_domains(&report.domains);
        if !report.user_profiles.is_empty() {
            println!();
            self.render_user_profiles(&report.user_profiles);
        }
        if !report.shared_spaces.is_empty() {
            println!();
            self.render_spaces(&report.shared_spaces);
        }
        self.render_failures(&report.failures);
    }

    fn render_inventory_metrics(&self, m: &InventoryMetrics) {
        self.ctx.kv("Regions:", &m.regions.to_string());
        self.ctx.kv("Domains:", &m.domains.to_string());
        self.ctx.kv("User profiles:", &m.user_profiles.to_string());
        self.ctx.kv("Shared spaces:", &m.shared_spaces.to_string());
    }

    fn render_domains(&self, domains: &[Domain]) {
        if domains.is_empty() {
            self.ctx.info("No domains found.");
            return;
        }
        println!(
            "  {}",
            format!(
                "{:<12} {:<16} {:<28} {:<10} {:<17}",
                "REGION", "DOMAIN ID", "NAME", "STATUS", "CREATED"
            )
            .style(self.ctx.styles.column)
        );
        for d in domains {
            println!(
                "  {:<12} {:<16} {:<28} {} {:<17}",
                d.region,
                d.domain_id,
                d.domain_name,
                format!("{:<10}", d.status).style(self.ctx.styles.status(&d.status)),
                when(d.creation_time.as_ref()),
            );
        }
    }

    fn render_user_profiles(&self, profiles: &[UserProfile]) {
        self.ctx.header("User profiles");
        println!(
            "  {}",
            format!(
                "{:<16} {:<28} {:<10} {:<5} {}",
                "DOMAIN ID", "USER PROFILE", "STATUS", "VPC", "EXECUTION ROLE"
            )
            .style(self.ctx.styles.column)
        );
        for p in profiles {
            println!(
                "  {:<16} {:<28} {} {:<5} {}",
                p.domain_id,
                p.user_profile_name,
                format!("{:<10}", p.status).style(self.ctx.styles.status(&p.status)),
                if p.in_vpc { "yes" } else { "no" },
                or_dash(p.execution_role.as_deref()),
            );
        }
    }

    fn render_spaces(&self, spaces: &[SharedSpace]) {
        self.ctx.header("Shared spaces");
        println!(
            "  {}",
            format!("{:<16} {:<28} {:<10}", "DOMAIN ID", "SPACE", "STATUS")
                .style(self.ctx.styles.column)
        );
        for s in spaces {
            println!(
                "  {:<16} {:<28} {}",
                s.domain_id,
                s.space_name,
                s.status.style(self.ctx.styles.status(&s.status)),
            );
        }
    }

    /// Render the app list of one region with its counters.
    pub fn render_apps(&self, report: &AppReport) {
        self.render_app_metrics(&report.metrics);
        println!();
        if report.apps.is_empty() {
            self.ctx
                .info(&format!("No running apps in {}.", report.region));
        } else {
            println!(
                "  {}",
                format!(
                    "{:<14} {:<12} {:<24} {:<16} {:<40} {:<14} {:<10} {}",
                    "DOMAIN ID",
                    "OWNER TYPE",
                    "OWNER",
                    "APP TYPE",
                    "APP NAME",
                    "INSTANCE",
                    "STATUS",
                    "LAST ACTIVE"
                )
                .style(self.ctx.styles.column)
            );
            for app in &report.apps {
                println!(
                    "  {:<14} {:<12} {:<24} {:<16} {:<40} {:<14} {} {}",
                    app.domain_id,
                    app.owner_type.to_string(),
                    app.owner,
                    app.app_type,
                    app.app_name,
                    or_dash(app.instance_type.as_deref()),
                    format!("{:<10}", app.status).style(self.ctx.styles.status(&app.status)),
                    when(app.last_user_activity.as_ref()),
                );
                if let Some(reason) = &app.failure_reason {
                    println!("    {}", reason.style(self.ctx.styles.error));
                }
            }
        }
        self.render_failures(&report.failures);
    }

    fn render_app_metrics(&self, m: &AppMetrics) {
        self.ctx.kv("Domains:", &m.domains.to_string());
        self.ctx.kv("Apps:", &m.apps.to_string());
        self.ctx.kv("User apps:", &m.user_apps.to_string());
        self.ctx.kv("Shared space apps:", &m.shared_space_apps.to_string());
        self.ctx.kv("Instances:", &m.instance_count().to_string());
        for (instance, owners) in &m.owners_by_instance {
            self.ctx
                .kv(&format!("  {instance}:"), &owners.join(", "));
        }
    }

    /// Render kernel sessions grouped by instance type and app.
    pub fn render_sessions(&self, output: &SessionsOutput) {
        let o = &output.owner;
        self.ctx.header(&format!(
            "{} '{}' in {}/{}",
            o.owner_type, o.owner, o.region, o.domain_id
        ));
        self.render_kernel_metrics(&output.metrics, output.sessions.terminals.len());
        println!();

        if output.sessions.by_instance.is_empty() {
            self.ctx.info("No kernel sessions.");
        }
        for (instance, apps) in &output.sessions.by_instance {
            println!("  {}", instance.style(self.ctx.styles.bold));
            for (app, sessions) in apps {
                println!("    {}", app.style(self.ctx.styles.dim));
                for s in sessions {
                    println!(
                        "      {:<10} {:<40} {:<8} {}",
                        format!("{:?}", s.resource_type).to_lowercase(),
                        s.resource_path,
                        s.execution_status,
                        or_dash(s.last_activity.as_deref()),
                    );
                }
            }
        }

        if !output.sessions.terminals.is_empty() {
            println!();
            self.ctx.header("Terminals");
            for t in &output.sessions.terminals {
                println!(
                    "    {:<10} {}",
                    t.name,
                    or_dash(t.last_activity.as_deref())
                );
            }
        }
    }

    fn render_kernel_metrics(&self, m: &KernelMetrics, terminals: usize) {
        self.ctx.kv("Instances:", &m.instances.to_string());
        self.ctx.kv("Apps:", &m.apps.to_string());
        self.ctx.kv("Notebooks:", &m.notebooks.to_string());
        self.ctx.kv("Other sessions:", &m.others.to_string());
        self.ctx.kv("Terminals:", &terminals.to_string());
    }

    /// Render the result of each delete request.
    pub fn render_outcomes(&self, outcomes: &[TerminateOutcome]) {
        if outcomes.is_empty() {
            self.ctx.info("Nothing to terminate.");
            return;
        }
        let deleted = outcomes
            .iter()
            .filter(|o| o.result == TerminateStatus::Deleted)
            .count();
        for o in outcomes {
            match &o.result {
                TerminateStatus::Deleted => self.ctx.success(&format!("Deleted {}", o.target)),
                TerminateStatus::NotFound => {
                    self.ctx.info(&format!("Already gone: {}", o.target));
                }
                TerminateStatus::PermissionDenied(msg) => self
                    .ctx
                    .error(&format!("Permission denied for {}: {msg}", o.target)),
                TerminateStatus::Failed(msg) => {
                    self.ctx.error(&format!("Failed {}: {msg}", o.target));
                }
            }
        }
        self.ctx
            .kv("Deleted:", &format!("{deleted} of {}", outcomes.len()));
    }

    /// Render scopes that could not be listed.
    pub fn render_failures(&self, failures: &[ScopeFailure]) {
        if failures.is_empty() {
            return;
        }
        println!();
        for f in failures {
            self.ctx
                .warn(&format!("Incomplete: {} ({})", f.scope, f.error));
        }
    }

    /// Render the current configuration.
    pub fn render_config(&self, config: &StudioConfig, path: &Path) {
        println!();
        println!(
            "  {}",
            format!("Configuration ({})", path.display()).style(self.ctx.styles.header)
        );
        println!();
        for key in crate::domain::config::VALID_CONFIG_KEYS {
            let value = config.get(key).unwrap_or_default();
            println!("  {:<22} {value}", format!("{key}:"));
        }
        println!();
        println!("  {}", "Environment:".style(self.ctx.styles.bold));
        for var in ["STUDIOCTL_CONFIG", "STUDIOCTL_LOG", "AWS_PROFILE", "NO_COLOR"] {
            println!(
                "    {:<18} {}",
                format!("{var}:"),
                std::env::var(var).unwrap_or_else(|_| "(not set)".to_string())
            );
        }
        println!();
    }

    /// Render the number of cache entries removed.
    pub fn render_cache_cleared(&self, removed: usize) {
        self.ctx
            .success(&format!("Removed {removed} cached result(s)"));
    }
}
