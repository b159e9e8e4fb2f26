//! Build plan generation.
//!
//! A BuildPlan lists the pipeline stages for one configuration run in the
//! order they execute. The edges are hard dependencies: each step is only
//! scheduled after its predecessor finished successfully.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::core::profile::BuildProfile;
use crate::pipeline::context::BuildContext;
use crate::pipeline::install::InstallComponent;

/// A pipeline step in execution order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BuildStep {
    /// Compile the bound crate with the selected kind and profile.
    Compile {
        crate_name: String,
        crate_type: String,
        profile: BuildProfile,
    },

    /// Regenerate the C header from the exported ABI (post-build).
    SynthesizeHeader { output: PathBuf },

    /// Advertise the header directory to consumers of the target.
    WireInclude { include_dir: PathBuf },

    /// Register the runtime artifact for installation (dynamic kind only).
    RegisterInstall {
        component: InstallComponent,
        dest: PathBuf,
    },
}

/// The ordered steps of one configuration run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildPlan {
    pub steps: Vec<BuildStep>,
}

impl BuildPlan {
    /// Plan the pipeline for a build context.
    ///
    /// The install step is present iff the artifact kind is dynamic.
    pub fn new(ctx: &BuildContext) -> Self {
        let mut steps = vec![
            BuildStep::Compile {
                crate_name: ctx.manifest.krate.name.clone(),
                crate_type: ctx.kind.crate_type().to_string(),
                profile: ctx.profile,
            },
            BuildStep::SynthesizeHeader {
                output: ctx.header_path(),
            },
            BuildStep::WireInclude {
                include_dir: ctx.include_dir(),
            },
        ];

        if ctx.kind.is_dynamic() {
            steps.push(BuildStep::RegisterInstall {
                component: InstallComponent::Runtime,
                dest: PathBuf::from("lib").join(ctx.artifact_filename()),
            });
        }

        BuildPlan { steps }
    }

    /// Number of steps in the plan.
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Serialize the plan as pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::manifest::ProjectManifest;

    fn ctx(shared: bool, profile: BuildProfile) -> BuildContext {
        let manifest: ProjectManifest = toml::from_str("[crate]\nname = \"bdd-capi\"\n").unwrap();
        BuildContext::new("/proj", manifest, shared, profile)
    }

    fn step_names(plan: &BuildPlan) -> Vec<&'static str> {
        plan.steps
            .iter()
            .map(|s| match s {
                BuildStep::Compile { .. } => "compile",
                BuildStep::SynthesizeHeader { .. } => "synthesize_header",
                BuildStep::WireInclude { .. } => "wire_include",
                BuildStep::RegisterInstall { .. } => "register_install",
            })
            .collect()
    }

    #[test]
    fn test_step_order_is_fixed() {
        for profile in [
            BuildProfile::Dev,
            BuildProfile::Release,
            BuildProfile::ReleaseWithDebug,
        ] {
            let plan = BuildPlan::new(&ctx(true, profile));
            assert_eq!(
                step_names(&plan),
                vec!["compile", "synthesize_header", "wire_include", "register_install"]
            );

            let plan = BuildPlan::new(&ctx(false, profile));
            assert_eq!(
                step_names(&plan),
                vec!["compile", "synthesize_header", "wire_include"]
            );
        }
    }

    #[test]
    fn test_install_step_iff_dynamic() {
        let dynamic = BuildPlan::new(&ctx(true, BuildProfile::Release));
        assert!(matches!(
            dynamic.steps.last(),
            Some(BuildStep::RegisterInstall { .. })
        ));

        let static_plan = BuildPlan::new(&ctx(false, BuildProfile::Release));
        assert!(!static_plan
            .steps
            .iter()
            .any(|s| matches!(s, BuildStep::RegisterInstall { .. })));
    }

    #[test]
    fn test_compile_step_carries_kind_and_profile() {
        let plan = BuildPlan::new(&ctx(true, BuildProfile::ReleaseWithDebug));
        match &plan.steps[0] {
            BuildStep::Compile {
                crate_name,
                crate_type,
                profile,
            } => {
                assert_eq!(crate_name, "bdd-capi");
                assert_eq!(crate_type, "cdylib");
                assert_eq!(*profile, BuildProfile::ReleaseWithDebug);
            }
            other => panic!("expected compile step, got {:?}", other),
        }
    }

    #[test]
    fn test_plan_serialization() {
        let plan = BuildPlan::new(&ctx(true, BuildProfile::Release));
        let json = plan.to_json().unwrap();

        assert!(json.contains("\"type\": \"compile\""));
        assert!(json.contains("\"type\": \"register_install\""));

        let parsed: BuildPlan = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.step_count(), plan.step_count());
    }
}
