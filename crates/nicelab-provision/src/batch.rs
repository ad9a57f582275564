//! Platform command batches.
//!
//! Each platform maps to an ordered list of command templates. Templates
//! use three placeholders: `{user}`, `{root}` (shared storage root), and
//! `{password}`.

use nicelab_core::config::ProvisioningConfig;
use nicelab_entity::LabPlatform;

struct BatchTemplate {
    platform: LabPlatform,
    commands: &'static [&'static str],
}

const BATCHES: &[BatchTemplate] = &[
    BatchTemplate {
        platform: LabPlatform::Linux,
        commands: &[
            r#"adduser --gecos "" {user}"#,
            r#"echo "{user}:{password}" | chpasswd"#,
            r#"/usr/bin/dcv create-session --owner={user} {user}"#,
            r#"mkdir -p {root}/{user}/linux"#,
            r#"mkdir -p /home/{user}/Desktop"#,
            r#"chown -R {user}:{user} /home/{user}/Desktop"#,
            r#"ln -s {root}/{user}/linux /home/{user}/Desktop/NiceLabData"#,
        ],
    },
    BatchTemplate {
        platform: LabPlatform::Windows,
        commands: &[
            r#"New-LocalUser -Name "{user}" -NoPassword -FullName "{user}""#,
            r#"net user "{user}" "{password}""#,
            r#"."C:\Program Files\NICE\DCV\Server\bin\dcv.exe" create-session --owner={user} {user}"#,
            r#"md "{root}\{user}" 2>NUL"#,
            r#"md "{root}\{user}\windows" 2>NUL"#,
            r#"$shortcut=(New-Object -ComObject WScript.Shell).CreateShortcut('C:\Users\{user}\Desktop\DCV-Storage.lnk');$shortcut.TargetPath='{root}\{user}\windows';$shortcut.Save()"#,
        ],
    },
];

/// Values substituted into a batch.
#[derive(Debug, Clone)]
pub struct BatchParams<'a> {
    pub username: &'a str,
    pub password: &'a str,
    pub storage_root: &'a str,
}

/// Render the ordered command list for `platform`.
pub fn build_command_batch(platform: LabPlatform, params: &BatchParams<'_>) -> Vec<String> {
    BATCHES
        .iter()
        .find(|batch| batch.platform == platform)
        .map(|batch| {
            batch
                .commands
                .iter()
                .map(|template| render(template, params))
                .collect()
        })
        .unwrap_or_default()
}

/// Command document that interprets the batch for `platform`.
pub fn document_for<'a>(platform: LabPlatform, config: &'a ProvisioningConfig) -> &'a str {
    match platform {
        LabPlatform::Linux => &config.linux_document,
        LabPlatform::Windows => &config.windows_document,
    }
}

/// Shared storage root as seen from a `platform` machine.
pub fn storage_root_for<'a>(platform: LabPlatform, config: &'a ProvisioningConfig) -> &'a str {
    match platform {
        LabPlatform::Linux => &config.shared_storage_root_linux,
        LabPlatform::Windows => &config.shared_storage_root_windows,
    }
}

// Password goes last so a password containing a placeholder is left verbatim.
fn render(template: &str, params: &BatchParams<'_>) -> String {
    template
        .replace("{root}", params.storage_root)
        .replace("{user}", params.username)
        .replace("{password}", params.password)
}
