//! Conversion of an ONNX model into a serialized TensorRT engine.
//!
//! The workflow is linear: configure, parse, build and then optionally serialize. Every TensorRT
//! object is owned by a local wrapper and released when the function returns, on success or error.

use std::path::Path;
use std::sync::Arc;

use crate::config::{BuildConfig, Precision};
use crate::error::Error;
use crate::ffi::builder::Builder;
use crate::ffi::builder_config::BuilderConfig;
use crate::ffi::engine::Engine;
use crate::ffi::logger::Logger;
use crate::ffi::network::NetworkDefinition;
use crate::ffi::parser::Parser;
use crate::ffi::plugins::init_plugins;
use crate::ffi::runtime::Runtime;
use crate::ffi::version::{library_version, MIN_SUPPORTED_VERSION};

type Result<T> = std::result::Result<T, Error>;

/// Build an engine from an ONNX model.
///
/// # Arguments
///
/// * `logger` - Logger shared by every TensorRT object created during the build.
/// * `model_path` - ONNX model to parse.
/// * `config` - Builder options.
///
/// # Return value
///
/// The compiled engine, or `None` if TensorRT finished without producing a plan. Parser failures
/// and input shape mismatches are errors.
pub fn build_engine(
    logger: &Arc<Logger>,
    model_path: impl AsRef<Path>,
    config: &BuildConfig,
) -> Result<Option<Engine>> {
    let model_path = model_path.as_ref();
    config.validate()?;

    let version = library_version();
    if !version.is_supported() {
        return Err(Error::UnsupportedVersion {
            found: version,
            required: MIN_SUPPORTED_VERSION,
        });
    }
    tracing::debug!(%version, "using TensorRT");

    logger.clear_last_error();
    init_plugins(logger)?;

    let mut builder = Builder::new(logger)?;
    let network = builder.network_definition()?;
    let mut network = Parser::parse_network_definition_from_file(network, &model_path, logger)?;
    tracing::debug!(
        model = %model_path.display(),
        inputs = network.num_inputs(),
        outputs = network.num_outputs(),
        "parsed model"
    );

    let builder_config = configure(&mut builder, &network, config)?;

    tracing::info!(
        precision = %config.precision,
        batch_size = config.batch_size,
        workspace_mb = config.workspace_mb,
        "building engine"
    );
    build_network(logger, &mut builder, &mut network, builder_config)
}

/// Build a configured network and deserialize the plan. `None` if TensorRT produced no plan.
fn build_network(
    logger: &Arc<Logger>,
    builder: &mut Builder,
    network: &mut NetworkDefinition,
    builder_config: BuilderConfig,
) -> Result<Option<Engine>> {
    let Some(plan) = builder.build_serialized_network(network, builder_config) else {
        tracing::warn!(
            reason = %logger.last_error_message(),
            "TensorRT did not produce a plan"
        );
        return Ok(None);
    };
    tracing::debug!(size = plan.size(), "built plan");

    let runtime = Runtime::new(logger)?;
    runtime.deserialize_engine_from_plan(&plan).map(Some)
}

/// Create missing parent directories of `path`, serialize the engine and write it to `path`.
///
/// There is no protection against concurrent writers.
pub fn save_engine(engine: &Engine, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    create_parent_dir(path)?;
    let plan = engine.serialize()?;
    write_engine_file(path, plan.as_bytes())
}

/// Read a serialized engine from `path` and deserialize it.
///
/// The bytes are handed to TensorRT unchecked. A corrupt or incompatible file results in
/// [`Error::TensorRt`].
///
/// # Arguments
///
/// * `runtime` - Runtime to deserialize with. It is moved into the returned engine.
/// * `path` - Engine file written by [`save_engine`].
pub fn load_engine(runtime: Runtime, path: impl AsRef<Path>) -> Result<Engine> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|err| Error::io(path, err))?;
    tracing::debug!(path = %path.display(), size = bytes.len(), "read engine file");
    runtime.deserialize_engine(&bytes)
}

fn create_parent_dir(path: &Path) -> Result<()> {
    match path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        Some(dir) => std::fs::create_dir_all(dir).map_err(|err| Error::io(dir, err)),
        None => Ok(()),
    }
}

fn write_engine_file(path: &Path, bytes: &[u8]) -> Result<()> {
    std::fs::write(path, bytes).map_err(|err| Error::io(path, err))?;
    tracing::debug!(path = %path.display(), size = bytes.len(), "wrote engine file");
    Ok(())
}

/// Check the network against `config` and create the matching builder configuration.
fn configure(
    builder: &mut Builder,
    network: &NetworkDefinition,
    config: &BuildConfig,
) -> Result<BuilderConfig> {
    let inputs = network.inputs();
    let [input] = inputs.as_slice() else {
        return Err(Error::InputCount(inputs.len()));
    };
    let outputs = network.outputs();
    if outputs.is_empty() {
        return Err(Error::NoOutputs);
    }
    tracing::debug!(
        outputs = ?outputs.iter().map(|output| output.name()).collect::<Vec<_>>(),
        "network outputs"
    );

    let input_name = input.name();
    let input_shape = resolve_input_shape(&input_name, &input.dimensions(), config.input_shape())?;

    let mut builder_config = builder
        .config()?
        .with_max_workspace_size(config.workspace_bytes());
    if config.precision == Precision::Float16 {
        if !builder.platform_has_fast_fp16() {
            tracing::warn!("platform has no fast native FP16, the engine may be slow");
        }
        builder_config = builder_config.with_fp16();
    }

    if let InputShape::Dynamic { min, max } = input_shape {
        tracing::debug!(input = %input_name, ?min, ?max, "adding optimization profile");
        let mut profile = builder.optimization_profile()?;
        profile.set_shape(&input_name, &min, &max, &max)?;
        builder_config.add_optimization_profile(profile)?;
    }

    Ok(builder_config)
}

/// How the declared input shape of a network relates to the requested shape.
#[derive(Debug, Clone, PartialEq, Eq)]
enum InputShape {
    /// Every dimension is fixed and equal to the requested one.
    Static,
    /// At least one dimension is only known at runtime and must be covered by a profile.
    Dynamic { min: [i32; 4], max: [i32; 4] },
}

/// Match the declared input shape against the expected `[batch, 3, width, height]` shape.
///
/// A declared dimension must either equal the expected one or be dynamic (`-1`). A dynamic batch
/// dimension accepts batches from 1 up to the expected batch size, every other dynamic dimension is
/// pinned to its expected value.
fn resolve_input_shape(name: &str, declared: &[i32], expected: [i32; 4]) -> Result<InputShape> {
    let mismatch = || Error::InputMismatch {
        name: name.to_string(),
        declared: declared.to_vec(),
        expected: expected.to_vec(),
    };
    if declared.len() != expected.len() {
        return Err(mismatch());
    }

    let mut dynamic = false;
    for (&declared_dim, &expected_dim) in declared.iter().zip(expected.iter()) {
        if declared_dim == -1 {
            dynamic = true;
        } else if declared_dim != expected_dim {
            return Err(mismatch());
        }
    }

    if !dynamic {
        return Ok(InputShape::Static);
    }
    let mut min = expected;
    if declared[0] == -1 {
        min[0] = 1;
    }
    Ok(InputShape::Dynamic { min, max: expected })
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::tests::onnx::*;
    use crate::tests::utils::*;

    fn fixed_config() -> BuildConfig {
        BuildConfig::default()
            .with_input_size(32, 32)
            .with_workspace_mb(64)
    }

    #[test]
    fn test_resolve_static_shape() {
        assert_eq!(
            resolve_input_shape("input", &[1, 3, 300, 300], [1, 3, 300, 300]).unwrap(),
            InputShape::Static
        );
    }

    #[test]
    fn test_resolve_dynamic_batch() {
        assert_eq!(
            resolve_input_shape("input", &[-1, 3, 300, 300], [8, 3, 300, 300]).unwrap(),
            InputShape::Dynamic {
                min: [1, 3, 300, 300],
                max: [8, 3, 300, 300],
            }
        );
    }

    #[test]
    fn test_resolve_dynamic_spatial_dims() {
        assert_eq!(
            resolve_input_shape("input", &[2, 3, -1, -1], [2, 3, 480, 640]).unwrap(),
            InputShape::Dynamic {
                min: [2, 3, 480, 640],
                max: [2, 3, 480, 640],
            }
        );
    }

    #[test]
    fn test_resolve_non_square_input() {
        let expected = BuildConfig::default()
            .with_input_size(640, 480)
            .input_shape();
        assert_eq!(
            resolve_input_shape("Input", &[1, 3, 640, 480], expected).unwrap(),
            InputShape::Static
        );
        assert!(matches!(
            resolve_input_shape("Input", &[1, 3, 480, 640], expected),
            Err(Error::InputMismatch { .. })
        ));
    }

    #[test]
    fn test_resolve_mismatch() {
        let err = resolve_input_shape("input", &[1, 3, 224, 224], [1, 3, 300, 300]).unwrap_err();
        match err {
            Error::InputMismatch {
                name,
                declared,
                expected,
            } => {
                assert_eq!(name, "input");
                assert_eq!(declared, vec![1, 3, 224, 224]);
                assert_eq!(expected, vec![1, 3, 300, 300]);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(resolve_input_shape("input", &[1, 1, 300, 300], [1, 3, 300, 300]).is_err());
        assert!(resolve_input_shape("input", &[3, 300, 300], [1, 3, 300, 300]).is_err());
    }

    #[test]
    fn test_create_parent_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a").join("b").join("engine.trt");
        create_parent_dir(&path).unwrap();
        assert!(dir.path().join("a").join("b").is_dir());
        write_engine_file(&path, b"plan").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"plan");
        create_parent_dir(Path::new("engine.trt")).unwrap();
    }

    #[test]
    fn test_write_engine_file_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.trt");
        write_engine_file(&path, b"first").unwrap();
        write_engine_file(&path, b"second").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"second");
    }

    #[test]
    fn test_load_engine_missing_file() {
        let logger = test_logger!();
        let runtime = Runtime::new(&logger).unwrap();
        let result = load_engine(runtime, "/nonexistent/engine.trt");
        assert!(matches!(result, Err(Error::Io { .. })));
    }

    #[test]
    fn test_build_engine() {
        let logger = test_logger!();
        let model = fixed_onnx_file!();
        let engine = build_engine(&logger, model.path(), &fixed_config())
            .unwrap()
            .unwrap();
        assert_eq!(engine.num_io_tensors(), 2);
        assert_eq!(engine.tensor_shape("input"), &[1, 3, 32, 32]);
    }

    #[test]
    fn test_build_save_load() {
        let logger = test_logger!();
        let model = fixed_onnx_file!();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("engine.trt");

        let engine = build_engine(&logger, model.path(), &fixed_config())
            .unwrap()
            .unwrap();
        save_engine(&engine, &path).unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() > 0);

        let runtime = Runtime::new(&logger).unwrap();
        let loaded = load_engine(runtime, &path).unwrap();
        assert_eq!(loaded.io_tensors(), engine.io_tensors());
    }

    #[test]
    fn test_build_without_plan_returns_none() {
        let logger = test_logger!();
        let mut builder = Builder::new(&logger).unwrap();
        // A network without outputs cannot be built.
        let mut network = builder.network_definition().unwrap();
        let builder_config = builder.config().unwrap();
        let engine = build_network(&logger, &mut builder, &mut network, builder_config).unwrap();
        assert!(engine.is_none());
    }

    #[test]
    fn test_build_fp16_engine() {
        let logger = test_logger!();
        let model = fixed_onnx_file!();
        let config = fixed_config().with_precision(Precision::Float16);
        assert!(build_engine(&logger, model.path(), &config)
            .unwrap()
            .is_some());
    }

    #[test]
    fn test_configure_sets_precision_and_workspace() {
        let (_logger, mut builder, network) = fixed_network!();

        let builder_config = configure(&mut builder, &network, &fixed_config()).unwrap();
        assert!(!builder_config.fp16());
        assert_eq!(builder_config.max_workspace_size(), 64 << 20);
        assert_eq!(builder_config.num_optimization_profiles(), 0);

        let config = fixed_config().with_precision(Precision::Float16);
        let builder_config = configure(&mut builder, &network, &config).unwrap();
        assert!(builder_config.fp16());
    }

    #[test]
    fn test_configure_dynamic_input_adds_profile() {
        let (_logger, mut builder, network) = dynamic_network!();
        let config = fixed_config().with_batch_size(4);
        let builder_config = configure(&mut builder, &network, &config).unwrap();
        assert_eq!(builder_config.num_optimization_profiles(), 1);
    }

    #[test]
    fn test_build_dynamic_engine() {
        let logger = test_logger!();
        let model = dynamic_onnx_file!();
        let config = fixed_config().with_batch_size(4);
        let engine = build_engine(&logger, model.path(), &config)
            .unwrap()
            .unwrap();
        assert_eq!(engine.tensor_shape("input"), &[-1, 3, -1, -1]);
    }

    #[test]
    fn test_build_rejects_size_mismatch() {
        let logger = test_logger!();
        let model = fixed_onnx_file!();
        let config = BuildConfig::default();
        assert!(matches!(
            build_engine(&logger, model.path(), &config),
            Err(Error::InputMismatch { .. })
        ));
    }

    #[test]
    fn test_build_rejects_channel_mismatch() {
        let logger = test_logger!();
        let model = single_channel_onnx_file!();
        assert!(matches!(
            build_engine(&logger, model.path(), &fixed_config()),
            Err(Error::InputMismatch { .. })
        ));
    }

    #[test]
    fn test_build_rejects_invalid_config() {
        let logger = test_logger!();
        let model = fixed_onnx_file!();
        let config = fixed_config().with_batch_size(0);
        assert!(matches!(
            build_engine(&logger, model.path(), &config),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_build_rejects_unparseable_model() {
        let logger = test_logger!();
        let model = onnx_file!(b"not an onnx model");
        assert!(matches!(
            build_engine(&logger, model.path(), &fixed_config()),
            Err(Error::Parse { .. })
        ));
    }
}
