//! `conda build` command line

use hcb_config::TargetConfig;
use std::fmt;
use std::path::Path;

/// A fully computed `conda build` invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CondaBuildCommand {
    program: String,
    args: Vec<String>,
}

impl CondaBuildCommand {
    /// `<program> build <recipe-dir> --output-folder <output-dir> --override-channels
    /// [--numpy <version>] [--channel <c>]...`
    ///
    /// Channels keep their order. Default channels are always overridden so
    /// only the listed ones are searched.
    #[must_use]
    pub fn new(
        program: &str,
        recipe_dir: &Path,
        output_dir: &Path,
        channels: &[String],
        numpy_version: Option<&str>,
    ) -> Self {
        let mut args = vec![
            "build".to_string(),
            recipe_dir.display().to_string(),
            "--output-folder".to_string(),
            output_dir.display().to_string(),
            "--override-channels".to_string(),
        ];

        if let Some(numpy) = numpy_version {
            args.push("--numpy".to_string());
            args.push(numpy.to_string());
        }

        for channel in channels {
            args.push("--channel".to_string());
            args.push(channel.clone());
        }

        Self {
            program: program.to_string(),
            args,
        }
    }

    /// Command for a target configuration
    #[must_use]
    pub fn from_config(config: &TargetConfig, recipe_dir: &Path, output_dir: &Path) -> Self {
        Self::new(
            &config.conda_executable,
            recipe_dir,
            output_dir,
            &config.channels,
            config.default_numpy_version.as_deref(),
        )
    }

    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl fmt::Display for CondaBuildCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}
