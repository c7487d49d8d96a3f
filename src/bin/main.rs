//! LS-SVM Command Line Interface
//!
//! A command-line interface for training, evaluating, tuning and using
//! LS-SVM models on CSV data.

use clap::{Args, Parser, Subcommand, ValueEnum};
use env_logger::Env;
use log::{error, info, warn};
use lssvm::api::{quick, LSSVC, LSSVR};
use lssvm::core::{Estimator, LSSVMError, Predictor, Result, SolverConfig};
use lssvm::data::CSVDataset;
use lssvm::hyperparams;
use lssvm::kernel::KernelSpec;
use lssvm::model::Strategy;
use lssvm::persistence::{ModelTask, SerializableModel};
use lssvm::utils::scaling::ScalingMethod;
use rayon::prelude::*;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "lssvm")]
#[command(about = "A Rust implementation of Least Squares Support Vector Machines")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a new model
    Train(TrainArgs),
    /// Make predictions using a trained model
    Predict(PredictArgs),
    /// Evaluate a model on test data
    Evaluate(EvaluateArgs),
    /// Display model information
    Info(InfoArgs),
    /// Grid search over gamma (and sigma for RBF) on a holdout split
    Tune(TuneArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq)]
enum CliTask {
    /// Class labels in the last column
    #[value(name = "classification")]
    Classification,
    /// Real-valued targets in the last column
    #[value(name = "regression")]
    Regression,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq)]
enum CliKernel {
    #[value(name = "linear")]
    Linear,
    #[value(name = "poly")]
    Polynomial,
    #[value(name = "rbf")]
    Rbf,
    #[value(name = "sigmoid")]
    Sigmoid,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum CliStrategy {
    /// One model per class pair, majority vote (default)
    #[value(name = "ovo")]
    OneVsOne,
    /// One model per class against all others
    #[value(name = "ovr")]
    OneVsRest,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum CliScalingMethod {
    /// Min-Max scaling to [-1, 1] range
    #[value(name = "minmax")]
    MinMax,
    /// Standard score (Z-score) normalization
    #[value(name = "standard")]
    StandardScore,
    /// Unit scaling by maximum absolute value
    #[value(name = "unit")]
    UnitScale,
}

impl From<CliScalingMethod> for ScalingMethod {
    fn from(cli_method: CliScalingMethod) -> Self {
        match cli_method {
            CliScalingMethod::MinMax => ScalingMethod::MinMax {
                min_val: -1.0,
                max_val: 1.0,
            },
            CliScalingMethod::StandardScore => ScalingMethod::StandardScore,
            CliScalingMethod::UnitScale => ScalingMethod::UnitScale,
        }
    }
}

impl From<CliStrategy> for Strategy {
    fn from(cli_strategy: CliStrategy) -> Self {
        match cli_strategy {
            CliStrategy::OneVsOne => Strategy::OneVsOne,
            CliStrategy::OneVsRest => Strategy::OneVsRest,
        }
    }
}

/// Kernel selection shared by `train` and `tune`
#[derive(Args, Clone, Debug)]
struct KernelArgs {
    /// Kernel function
    #[arg(short, long, default_value = "rbf")]
    kernel: CliKernel,

    /// RBF bandwidth
    #[arg(long, default_value = "1.0")]
    sigma: f64,

    /// Polynomial degree
    #[arg(long, default_value = "3")]
    degree: u32,

    /// Polynomial or sigmoid offset
    #[arg(long, default_value = "1.0")]
    coef0: f64,

    /// Sigmoid slope
    #[arg(long, default_value = "0.01")]
    alpha: f64,
}

impl KernelArgs {
    fn build(&self, sigma: f64) -> Result<KernelSpec> {
        match self.kernel {
            CliKernel::Linear => Ok(KernelSpec::linear()),
            CliKernel::Polynomial => KernelSpec::polynomial(self.degree, self.coef0),
            CliKernel::Rbf => KernelSpec::rbf(sigma),
            CliKernel::Sigmoid => KernelSpec::sigmoid(self.alpha, self.coef0),
        }
    }
}

#[derive(Args)]
struct TrainArgs {
    /// Training data file (CSV, last column is the label)
    #[arg(long)]
    data: PathBuf,

    /// Output model file
    #[arg(short, long)]
    output: PathBuf,

    /// Learning task
    #[arg(short, long, default_value = "classification")]
    task: CliTask,

    #[command(flatten)]
    kernel: KernelArgs,

    /// Regularization parameter gamma
    #[arg(short, long, default_value = "1.0")]
    gamma: f64,

    /// Relative residual tolerance of the linear solver
    #[arg(long, default_value = "1e-6")]
    tolerance: f64,

    /// Maximum solver iterations
    #[arg(short, long, default_value = "1000")]
    max_iterations: usize,

    /// Multiclass decomposition
    #[arg(long, default_value = "ovo")]
    strategy: CliStrategy,

    /// Feature scaling method
    #[arg(long)]
    feature_scaling: Option<CliScalingMethod>,
}

#[derive(Args)]
struct PredictArgs {
    /// Trained model file
    #[arg(short, long)]
    model: PathBuf,

    /// Input data file
    #[arg(long)]
    data: PathBuf,

    /// Output predictions file (optional, prints to stdout if not specified)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Show per-class scores (votes under one-vs-one)
    #[arg(long)]
    scores: bool,
}

#[derive(Args)]
struct EvaluateArgs {
    /// Trained model file
    #[arg(short, long)]
    model: PathBuf,

    /// Test data file
    #[arg(long)]
    data: PathBuf,

    /// Show the confusion matrix and per-class metrics
    #[arg(long)]
    detailed: bool,
}

#[derive(Args)]
struct InfoArgs {
    /// Model file
    model: PathBuf,
}

#[derive(Args)]
struct TuneArgs {
    /// Data file
    #[arg(long)]
    data: PathBuf,

    /// Learning task
    #[arg(short, long, default_value = "classification")]
    task: CliTask,

    #[command(flatten)]
    kernel: KernelArgs,

    /// Training ratio of the holdout split (0.0-1.0)
    #[arg(short, long, default_value = "0.8")]
    ratio: f64,

    /// Grid points per tuned parameter
    #[arg(long, default_value = "5")]
    grid_size: usize,

    /// Feature scaling method
    #[arg(long)]
    feature_scaling: Option<CliScalingMethod>,

    /// Retrain on all data with the best parameters and save the model
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.debug {
        "debug"
    } else if cli.verbose {
        "info"
    } else {
        "warn"
    };

    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    let result = match cli.command {
        Commands::Train(args) => train_command(args),
        Commands::Predict(args) => predict_command(args),
        Commands::Evaluate(args) => evaluate_command(args),
        Commands::Info(args) => info_command(args),
        Commands::Tune(args) => tune_command(args),
    };

    if let Err(e) = result {
        error!("Error: {e}");
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn classifier(
    kernel: KernelSpec,
    gamma: f64,
    solver: SolverConfig,
    strategy: Strategy,
    scaling: Option<CliScalingMethod>,
) -> LSSVC<String> {
    let svc = LSSVC::new()
        .with_kernel(kernel)
        .with_gamma(gamma)
        .with_solver(solver)
        .with_strategy(strategy);
    match scaling {
        Some(method) => svc.with_feature_scaling(method.into()),
        None => svc,
    }
}

fn regressor(
    kernel: KernelSpec,
    gamma: f64,
    solver: SolverConfig,
    scaling: Option<CliScalingMethod>,
) -> LSSVR {
    let svr = LSSVR::new()
        .with_kernel(kernel)
        .with_gamma(gamma)
        .with_solver(solver);
    match scaling {
        Some(method) => svr.with_feature_scaling(method.into()),
        None => svr,
    }
}

fn train_command(args: TrainArgs) -> Result<()> {
    info!("Training LS-SVM model...");
    info!("Data file: {:?}", args.data);

    let kernel = args.kernel.build(args.kernel.sigma)?;
    let solver = SolverConfig::new(args.tolerance, args.max_iterations)?;
    info!(
        "Parameters: kernel={}, gamma={}, tolerance={}, max_iter={}",
        kernel, args.gamma, args.tolerance, args.max_iterations
    );
    if let Some(scaling_method) = &args.feature_scaling {
        info!("Using feature scaling: {scaling_method:?}");
    }

    let dataset = CSVDataset::from_file(&args.data)?;
    info!(
        "Loaded {} samples with {} features",
        dataset.len(),
        dataset.n_features()
    );

    match args.task {
        CliTask::Classification => {
            let model = classifier(
                kernel,
                args.gamma,
                solver,
                args.strategy.into(),
                args.feature_scaling,
            )
            .fit(dataset.features(), dataset.labels())?;

            info!("Training completed successfully");
            let model_info = model.info();
            info!(
                "Classes: {}, sub-models: {}",
                model_info.n_classes, model_info.n_models
            );

            SerializableModel::from_classifier(&model)?.save_to_file(&args.output)?;
            info!("Model saved to: {:?}", args.output);

            // Quick evaluation on training data
            let metrics = model.evaluate(dataset.features(), dataset.labels())?;
            info!("Training accuracy: {:.2}%", metrics.accuracy() * 100.0);
        }
        CliTask::Regression => {
            let targets = dataset.targets()?;
            let model = regressor(kernel, args.gamma, solver, args.feature_scaling)
                .fit(dataset.features(), &targets)?;

            info!("Training completed successfully");
            SerializableModel::<String>::from_regressor(&model)?.save_to_file(&args.output)?;
            info!("Model saved to: {:?}", args.output);

            let metrics = model.evaluate(dataset.features(), &targets)?;
            info!("Training MSE: {:.6}", metrics.mse);
        }
    }

    Ok(())
}

fn predict_command(args: PredictArgs) -> Result<()> {
    info!("Loading model from: {:?}", args.model);
    let record = SerializableModel::<String>::load_from_file(&args.model)?;

    info!("Loading prediction data from: {:?}", args.data);
    let dataset = CSVDataset::from_file(&args.data)?;

    info!(
        "Making predictions using model with {} support vectors",
        record.metadata.n_support_vectors
    );

    let mut lines = Vec::with_capacity(dataset.len() + 2);
    lines.push(format!("# Predictions for {} samples", dataset.len()));

    match record.task {
        ModelTask::Classification => {
            let model = record.to_classifier()?;
            let predictions = model.predict(dataset.features())?;
            if args.scores {
                lines.push(format!(
                    "# Format: sample_index predicted_label scores[{}]",
                    model.classes().join(" ")
                ));
                let scores = model.class_scores(dataset.features())?;
                for (i, (label, row)) in predictions.iter().zip(scores.rows()).enumerate() {
                    let row: Vec<String> = row.iter().map(|s| format!("{s:.6}")).collect();
                    lines.push(format!("{i} {label} {}", row.join(" ")));
                }
            } else {
                lines.push("# Format: sample_index predicted_label".to_string());
                for (i, label) in predictions.iter().enumerate() {
                    lines.push(format!("{i} {label}"));
                }
            }
        }
        ModelTask::Regression => {
            if args.scores {
                warn!("--scores only applies to classifiers");
            }
            let model = record.to_regressor()?;
            let predictions = model.predict(dataset.features())?;
            lines.push("# Format: sample_index predicted_value".to_string());
            for (i, value) in predictions.iter().enumerate() {
                lines.push(format!("{i} {value:.6}"));
            }
        }
    }

    // Output results
    if let Some(output_path) = args.output {
        let file = File::create(&output_path)?;
        let mut writer = BufWriter::new(file);
        for line in &lines {
            writeln!(writer, "{line}")?;
        }
        writer.flush()?;
        info!("Predictions saved to: {output_path:?}");
    } else {
        for line in &lines {
            println!("{line}");
        }
    }

    Ok(())
}

fn evaluate_command(args: EvaluateArgs) -> Result<()> {
    info!("Loading model from: {:?}", args.model);
    let record = SerializableModel::<String>::load_from_file(&args.model)?;

    info!("Loading test data from: {:?}", args.data);
    let dataset = CSVDataset::from_file(&args.data)?;

    // Show evaluation results
    println!("=== Model Evaluation ===");
    record.print_summary();
    println!("\nTest Results:");

    match record.task {
        ModelTask::Classification => {
            let model = record.to_classifier()?;
            let metrics = model.evaluate(dataset.features(), dataset.labels())?;
            println!("  Samples:  {}", metrics.n_samples);
            println!("  Accuracy: {:.2}%", metrics.accuracy() * 100.0);

            if args.detailed {
                println!("\nConfusion Matrix (rows = true class, columns = predicted):");
                println!("  {:>12} {}", "", metrics.classes.join(" "));
                for (class, row) in metrics.classes.iter().zip(metrics.confusion.rows()) {
                    let counts: Vec<String> = row.iter().map(|c| c.to_string()).collect();
                    println!("  {:>12} {}", class, counts.join(" "));
                }
                println!("\nPer-class Metrics:");
                for (i, class) in metrics.classes.iter().enumerate() {
                    println!(
                        "  {:>12}  precision {:.4}  recall {:.4}  f1 {:.4}",
                        class,
                        metrics.precision(i),
                        metrics.recall(i),
                        metrics.f1_score(i)
                    );
                }
                println!("  Macro F1: {:.4}", metrics.macro_f1());
            }
        }
        ModelTask::Regression => {
            let model = record.to_regressor()?;
            let metrics = model.evaluate(dataset.features(), &dataset.targets()?)?;
            println!("  Samples: {}", metrics.n_samples);
            println!("  MSE:     {:.6}", metrics.mse);
            println!("  RMSE:    {:.6}", metrics.rmse());
            println!("  MAE:     {:.6}", metrics.mae);
            println!("  R2:      {:.6}", metrics.r2);
        }
    }

    Ok(())
}

fn info_command(args: InfoArgs) -> Result<()> {
    info!("Loading model from: {:?}", args.model);
    let record = SerializableModel::<String>::load_from_file(&args.model)?;

    record.print_summary();

    println!("\nSub-model Details:");
    for (i, sub) in record.sub_models.iter().enumerate() {
        let label = match sub.dichotomy {
            Some(d) => {
                let name = |idx: usize| record.classes.get(idx).map_or("?", String::as_str);
                match d.negative {
                    Some(negative) => format!("{} vs {}", name(d.positive), name(negative)),
                    None => format!("{} vs rest", name(d.positive)),
                }
            }
            None => "regression".to_string(),
        };
        println!(
            "  [{i}] {label}: {} samples, bias {:.6}",
            sub.dual.len(),
            sub.dual.bias
        );
    }

    Ok(())
}

/// One evaluated grid point
struct Candidate {
    gamma: f64,
    sigma: Option<f64>,
    score: f64,
}

fn tune_command(args: TuneArgs) -> Result<()> {
    let dataset = CSVDataset::from_file(&args.data)?;
    info!(
        "Tuning on {:?}: {} samples, ratio {}",
        args.data,
        dataset.len(),
        args.ratio
    );

    if !(args.ratio > 0.0 && args.ratio < 1.0) {
        return Err(LSSVMError::InvalidParameter(format!(
            "Train ratio must be between 0 and 1, got: {}",
            args.ratio
        )));
    }
    // Reject bad kernel parameters once instead of at every grid point
    args.kernel.build(args.kernel.sigma)?;

    let gammas = hyperparams::gamma().grid(args.grid_size)?;
    let sigmas: Vec<Option<f64>> = if args.kernel.kernel == CliKernel::Rbf {
        hyperparams::sigma()
            .grid(args.grid_size)?
            .into_iter()
            .map(Some)
            .collect()
    } else {
        vec![None]
    };
    let grid: Vec<(f64, Option<f64>)> = gammas
        .iter()
        .flat_map(|&g| sigmas.iter().map(move |&s| (g, s)))
        .collect();

    let targets = match args.task {
        CliTask::Regression => Some(dataset.targets()?),
        CliTask::Classification => None,
    };

    let evaluate = |gamma: f64, sigma: Option<f64>| -> Result<f64> {
        let kernel = args.kernel.build(sigma.unwrap_or(args.kernel.sigma))?;
        match &targets {
            Some(targets) => {
                let svr = regressor(kernel, gamma, SolverConfig::default(), args.feature_scaling);
                quick::holdout_mse(&svr, dataset.features(), targets, args.ratio)
            }
            None => {
                let svc = classifier(
                    kernel,
                    gamma,
                    SolverConfig::default(),
                    Strategy::default(),
                    args.feature_scaling,
                );
                quick::holdout_accuracy(&svc, dataset.features(), dataset.labels(), args.ratio)
            }
        }
    };

    // Only solver non-convergence is local to a grid point
    let results: Vec<Candidate> = grid
        .par_iter()
        .map(|&(gamma, sigma)| match evaluate(gamma, sigma) {
            Ok(score) => Ok(Some(Candidate { gamma, sigma, score })),
            Err(e) if e.is_recoverable() => {
                warn!("Skipping gamma={gamma}, sigma={sigma:?}: {e}");
                Ok(None)
            }
            Err(e) => Err(e),
        })
        .collect::<Result<Vec<_>>>()?
        .into_iter()
        .flatten()
        .collect();

    // Higher accuracy or lower MSE wins; the first grid point wins ties
    let better = |a: f64, b: f64| match args.task {
        CliTask::Classification => a > b,
        CliTask::Regression => a < b,
    };
    let best = results
        .iter()
        .fold(None::<&Candidate>, |best, c| match best {
            Some(b) if !better(c.score, b.score) => Some(b),
            _ => Some(c),
        })
        .ok_or_else(|| LSSVMError::InvalidInput("No grid point could be evaluated".to_string()))?;

    let metric = match args.task {
        CliTask::Classification => "accuracy",
        CliTask::Regression => "mse",
    };
    println!("=== Grid Search Results ===");
    println!("Data file: {:?}", args.data);
    println!("Train/test ratio: {:.2}/{:.2}", args.ratio, 1.0 - args.ratio);
    for c in &results {
        match c.sigma {
            Some(sigma) => println!(
                "  gamma={:<12.6} sigma={:<12.6} {metric}={:.6}",
                c.gamma, sigma, c.score
            ),
            None => println!("  gamma={:<12.6} {metric}={:.6}", c.gamma, c.score),
        }
    }
    match best.sigma {
        Some(sigma) => println!(
            "Best: gamma={} sigma={} {metric}={:.6}",
            best.gamma, sigma, best.score
        ),
        None => println!("Best: gamma={} {metric}={:.6}", best.gamma, best.score),
    }

    if let Some(output) = &args.output {
        let kernel = args.kernel.build(best.sigma.unwrap_or(args.kernel.sigma))?;
        match &targets {
            Some(targets) => {
                let svr = regressor(
                    kernel,
                    best.gamma,
                    SolverConfig::default(),
                    args.feature_scaling,
                );
                let model = svr.fit(dataset.features(), targets)?;
                SerializableModel::<String>::from_regressor(&model)?.save_to_file(output)?;
            }
            None => {
                let model = classifier(
                    kernel,
                    best.gamma,
                    SolverConfig::default(),
                    Strategy::default(),
                    args.feature_scaling,
                )
                .fit(dataset.features(), dataset.labels())?;
                SerializableModel::from_classifier(&model)?.save_to_file(output)?;
            }
        }
        info!("Best model saved to: {output:?}");
    }

    Ok(())
}
