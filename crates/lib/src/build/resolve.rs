//! Resolution of build parameters into a concrete build plan.

use thiserror::Error;
use tracing::{debug, info};

use super::types::{BuildOutputInfo, BuildParam, BuildPlan};
use crate::product::{ProductId, ProductTaskOutputInfo};
use crate::script::{self, ExecContext, Executor, ScriptError};
use crate::template::{self, TemplateContext, TemplateError};

/// Flag that carries linker options in the build invocation.
pub const LDFLAGS_FLAG: &str = "-ldflags";

/// Errors from resolving a product's build plan.
#[derive(Debug, Error)]
pub enum ResolveError {
  #[error("failed to render name template for product {product}")]
  NameTemplate {
    product: ProductId,
    #[source]
    source: TemplateError,
  },

  #[error("failed to execute script to generate build arguments for product {product}")]
  BuildArgs {
    product: ProductId,
    #[source]
    source: ScriptError,
  },

  #[error("failed to execute build script for product {product}")]
  Script {
    product: ProductId,
    #[source]
    source: ScriptError,
  },
}

impl ResolveError {
  pub fn product(&self) -> &ProductId {
    match self {
      ResolveError::NameTemplate { product, .. }
      | ResolveError::BuildArgs { product, .. }
      | ResolveError::Script { product, .. } => product,
    }
  }
}

/// The two tokens that set `version_var` to `version` at link time.
pub fn version_ldflags(version_var: &str, version: &str) -> [String; 2] {
  [LDFLAGS_FLAG.to_string(), format!("-X {version_var}={version}")]
}

impl BuildParam {
  /// Render the output description for a product and version.
  ///
  /// Output directory, main package and platforms are copied as-is.
  pub fn to_build_output_info(&self, product_id: &ProductId, version: &str) -> Result<BuildOutputInfo, ResolveError> {
    let ctx = TemplateContext::new(product_id.as_str(), version);
    let rendered = template::render(&self.name_template, &ctx).map_err(|source| ResolveError::NameTemplate {
      product: product_id.clone(),
      source,
    })?;

    Ok(BuildOutputInfo {
      build_name_template_rendered: rendered,
      build_output_dir: self.output_dir.clone(),
      main_pkg: self.main_pkg.clone(),
      os_archs: self.os_archs.clone(),
    })
  }

  /// Arguments for the build invocation.
  ///
  /// Script-derived arguments come first and the version injection pair
  /// last, so the injected version wins over anything the script sets.
  pub async fn build_args(
    &self,
    info: &ProductTaskOutputInfo,
    executor: &impl Executor,
  ) -> Result<Vec<String>, ResolveError> {
    let mut args = script::build_args_from_script(info, &self.build_args_script, executor)
      .await
      .map_err(|source| ResolveError::BuildArgs {
        product: info.product.clone(),
        source,
      })?;

    if !self.version_var.is_empty() {
      args.extend(version_ldflags(&self.version_var, &info.project.version));
    }

    Ok(args)
  }

  /// Resolve the complete build plan for the product in `info`.
  ///
  /// Either the whole plan is returned or an error; nothing partial.
  pub async fn resolve(&self, info: &ProductTaskOutputInfo, executor: &impl Executor) -> Result<BuildPlan, ResolveError> {
    let output = self.to_build_output_info(&info.product, &info.project.version)?;
    let args = self.build_args(info, executor).await?;

    debug!(
      product = %info.product,
      name = %output.build_name_template_rendered,
      args = ?args,
      "resolved build plan"
    );

    Ok(BuildPlan {
      product: info.product.0.clone(),
      version: info.project.version.clone(),
      output,
      args,
      environment: self.environment.clone(),
    })
  }

  /// Run the pre-build hook, if any. Returns its stdout.
  pub async fn run_build_script(
    &self,
    info: &ProductTaskOutputInfo,
    executor: &impl Executor,
  ) -> Result<Option<String>, ResolveError> {
    let ctx = ExecContext::for_product(info);
    let output = script::run_script(&self.script, &ctx, executor)
      .await
      .map_err(|source| ResolveError::Script {
        product: info.product.clone(),
        source,
      })?;

    Ok(output.map(|output| {
      info!(product = %info.product, "build script finished");
      debug!(product = %info.product, stdout = %output.stdout.trim_end(), "build script output");
      output.stdout
    }))
  }
}

#[cfg(test)]
mod tests {
  use std::error::Error as _;

  use super::*;
  use crate::platform::{OsArch, arch::Arch, os::Os};
  use crate::product::ProjectInfo;
  use crate::util::testutil::StubExecutor;

  fn info(product: &str, version: &str) -> ProductTaskOutputInfo {
    ProductTaskOutputInfo::new(ProjectInfo::new("/work/project", version), product)
  }

  fn linux_amd64() -> OsArch {
    OsArch::new(Os::Linux, Arch::Amd64)
  }

  #[test]
  fn output_info_renders_name() {
    let param = BuildParam::new("cmd/svc")
      .with_name_template("{{Product}}-{{Version}}")
      .with_output_dir("out")
      .with_os_archs([linux_amd64()]);

    let output = param.to_build_output_info(&ProductId::new("svc"), "2.0.0").unwrap();

    assert_eq!(
      output,
      BuildOutputInfo {
        build_name_template_rendered: "svc-2.0.0".to_string(),
        build_output_dir: "out".to_string(),
        main_pkg: "cmd/svc".to_string(),
        os_archs: vec![linux_amd64()],
      }
    );
  }

  #[test]
  fn output_info_keeps_empty_platforms() {
    let param = BuildParam::new(".");
    let output = param.to_build_output_info(&ProductId::new("svc"), "1.0.0").unwrap();
    assert!(output.os_archs.is_empty());
  }

  #[test]
  fn output_info_keeps_output_dir_unrendered() {
    let param = BuildParam::new(".").with_output_dir("out/{{Product}}");
    let output = param.to_build_output_info(&ProductId::new("svc"), "1.0.0").unwrap();
    assert_eq!(output.build_output_dir, "out/{{Product}}");
  }

  #[test]
  fn bad_name_template_names_product() {
    let param = BuildParam::new(".").with_name_template("{{Product}}-{{Arch}}");

    let err = param.to_build_output_info(&ProductId::new("svc"), "1.0.0").unwrap_err();

    assert_eq!(err.product().as_str(), "svc");
    assert!(matches!(
      err,
      ResolveError::NameTemplate {
        source: TemplateError::UnknownPlaceholder { .. },
        ..
      }
    ));
    assert!(err.to_string().contains("svc"));
  }

  #[tokio::test]
  async fn script_args_then_version_injection() {
    let executor = StubExecutor::stdout("-a\n-b\n");
    let param = BuildParam::new(".")
      .with_build_args_script("echo -a; echo -b")
      .with_version_var("pkg.Version");

    let args = param.build_args(&info("svc", "1.2.3"), &executor).await.unwrap();

    assert_eq!(args, vec!["-a", "-b", "-ldflags", "-X pkg.Version=1.2.3"]);
  }

  #[tokio::test]
  async fn no_version_var_appends_nothing() {
    let executor = StubExecutor::stdout("-a\n");
    let param = BuildParam::new(".").with_build_args_script("echo -a");

    let args = param.build_args(&info("svc", "1.2.3"), &executor).await.unwrap();

    assert_eq!(args, vec!["-a"]);
  }

  #[tokio::test]
  async fn version_injection_without_script() {
    let executor = StubExecutor::stdout("ignored\n");
    let param = BuildParam::new(".").with_version_var("main.version");

    let args = param.build_args(&info("svc", "0.1.0-3-gabc"), &executor).await.unwrap();

    assert_eq!(args, vec!["-ldflags", "-X main.version=0.1.0-3-gabc"]);
    assert_eq!(executor.calls(), 0);
  }

  #[tokio::test]
  async fn resolve_end_to_end() {
    let executor = StubExecutor::stdout("-trimpath\n");
    let param = BuildParam::new("cmd/svc")
      .with_name_template("{{Product}}-{{Version}}")
      .with_output_dir("out")
      .with_build_args_script("echo -trimpath")
      .with_version_var("main.version")
      .with_env("CGO_ENABLED", "0")
      .with_os_archs([linux_amd64()]);

    let plan = param.resolve(&info("svc", "2.0.0"), &executor).await.unwrap();

    assert_eq!(plan.product, "svc");
    assert_eq!(plan.output.build_name_template_rendered, "svc-2.0.0");
    assert_eq!(plan.output.build_output_dir, "out");
    assert_eq!(plan.output.os_archs, vec![linux_amd64()]);
    assert_eq!(plan.args, vec!["-trimpath", "-ldflags", "-X main.version=2.0.0"]);
    assert_eq!(plan.environment["CGO_ENABLED"], "0");
  }

  #[tokio::test]
  async fn resolve_fails_before_running_script_on_bad_template() {
    let executor = StubExecutor::stdout("-a\n");
    let param = BuildParam::new(".")
      .with_name_template("{{Product")
      .with_build_args_script("echo -a");

    let err = param.resolve(&info("svc", "1.0.0"), &executor).await.unwrap_err();

    assert!(matches!(err, ResolveError::NameTemplate { .. }));
    assert_eq!(executor.calls(), 0);
  }

  #[tokio::test]
  async fn resolve_surfaces_script_failure() {
    let executor = StubExecutor::failing(1, "no such tool");
    let param = BuildParam::new(".").with_build_args_script("missing-tool");

    let err = param.resolve(&info("svc", "1.0.0"), &executor).await.unwrap_err();

    assert!(matches!(err, ResolveError::BuildArgs { ref product, .. } if product.as_str() == "svc"));
    let source = err.source().unwrap().to_string();
    assert!(source.contains("no such tool"));
    assert!(source.contains("missing-tool"));
  }

  #[tokio::test]
  async fn build_script_runs_with_project_context() {
    let executor = StubExecutor::stdout("generated\n");
    let param = BuildParam::new(".").with_script("go generate ./...");

    let stdout = param.run_build_script(&info("svc", "1.0.0"), &executor).await.unwrap();

    assert_eq!(stdout.as_deref(), Some("generated\n"));
    assert_eq!(executor.scripts(), vec!["go generate ./..."]);
  }

  #[tokio::test]
  async fn empty_build_script_is_skipped() {
    let executor = StubExecutor::stdout("");
    let param = BuildParam::new(".");

    let stdout = param.run_build_script(&info("svc", "1.0.0"), &executor).await.unwrap();

    assert!(stdout.is_none());
    assert_eq!(executor.calls(), 0);
  }

  #[tokio::test]
  async fn build_script_failure_is_wrapped() {
    let executor = StubExecutor::failing(1, "");
    let param = BuildParam::new(".").with_script("false");

    let err = param.run_build_script(&info("svc", "1.0.0"), &executor).await.unwrap_err();

    assert!(matches!(err, ResolveError::Script { .. }));
  }
}
