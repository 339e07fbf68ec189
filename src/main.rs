// ==========================================
// 农业种植规划系统 - CLI 主入口
// ==========================================
// 职责: 命令行工作流(demo / solve / validate / templates / scenarios)
// 说明: 参数手工解析,不引入专门的 CLI 解析库
// ==========================================

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};

use agri_plan::config::{CliOverrides, PlannerConfig};
use agri_plan::domain::PlanningProblem;
use agri_plan::importer::{write_templates, ScenarioImporter, ScenarioImporterImpl};
use agri_plan::report::{export_csv, export_json, render_text_report};
use agri_plan::solver::{available_backends, solver_factory, SolveOptions};
use agri_plan::{logging, scenario, PlanningApi, SolveEvent, SolveStage, SolveWorker};

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = match args.first() {
        Some(c) => c.as_str(),
        None => {
            print_help();
            return ExitCode::SUCCESS;
        }
    };

    let result = match command {
        "demo" => run_demo().await,
        "solve" => run_solve(&args[1..]).await,
        "validate" => run_validate(&args[1..]).await,
        "templates" => run_templates(&args[1..]),
        "scenarios" => run_scenarios(&args[1..]),
        "help" | "--help" | "-h" => {
            print_help();
            return ExitCode::SUCCESS;
        }
        other => {
            eprintln!("未知命令: {}", other);
            print_help();
            return ExitCode::from(2);
        }
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("错误: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn print_help() {
    println!("{} v{}", agri_plan::APP_NAME, agri_plan::VERSION);
    println!();
    println!("用法:");
    println!("  agri-plan demo                        运行全部内置教学场景");
    println!("  agri-plan solve <场景目录|内置名称>    求解规划问题");
    println!("      --solver <name>                   求解后端 (默认 microlp)");
    println!("      --time-limit <secs>               求解时限,0 = 不限时");
    println!("      --out <dir>                       导出 JSON/CSV 到目录");
    println!("      --json                            以 JSON 形式输出方案");
    println!("      --integer                         启用 MILP 模式(0/1 作物选择)");
    println!("  agri-plan validate <场景目录|问题.json>  只校验不求解");
    println!("  agri-plan templates [dir]             生成数据模板文件");
    println!("  agri-plan scenarios [base-dir]        列出内置与磁盘场景");
    println!();
    println!("内置场景: {}", scenario::names().join(", "));
    println!("可用后端: {}", available_backends().join(", "));
}

// ==========================================
// demo - 跑一遍全部内置场景
// ==========================================
async fn run_demo() -> Result<ExitCode> {
    let api = PlanningApi::new();
    println!("运行 {} 个内置教学场景 (后端: {})", scenario::names().len(), api.backend_name());

    for name in scenario::names() {
        let problem = scenario::by_name(name)
            .ok_or_else(|| anyhow!("内置场景缺失: {}", name))?;
        let report = api
            .solve(&problem, &SolveOptions::default())
            .with_context(|| format!("场景 {} 求解失败", name))?;

        let kpis = &report.plan.kpis;
        println!(
            "[{}] 利润 {:.2} | 土地利用率 {:.1}% | 作物 {} 种 | {:.3}s",
            name,
            kpis.total_profit,
            kpis.land_utilization_pct,
            kpis.crops_planted,
            kpis.solve_time_seconds
        );
    }
    Ok(ExitCode::SUCCESS)
}

// ==========================================
// solve - 六步工作流
// ==========================================
async fn run_solve(args: &[String]) -> Result<ExitCode> {
    let (source, flags) = split_flags(args)?;
    let source = source.ok_or_else(|| anyhow!("solve 需要指定场景目录或内置场景名称"))?;

    let mut config = PlannerConfig::load()?;
    config.apply_cli_overrides(&flags.overrides);

    println!("[1/6] 加载规划问题: {}", source);
    let mut problem = load_problem(&source).await?;
    if flags.integer {
        problem.integer_allocations = true;
    }
    println!(
        "      作物 {} 种,地块 {} 块,总面积 {:.2} 公顷{}",
        problem.crops.len(),
        problem.parcels.len(),
        problem.total_area(),
        if problem.integer_allocations {
            " (MILP 模式)"
        } else {
            ""
        }
    );

    let backend = solver_factory(&config.default_backend)?;
    let options = SolveOptions {
        time_limit: config.time_limit(),
        verbose: config.verbose_solver,
    };

    // 阶段事件由工作线程回报,CLI 只负责打印
    let mut handle = SolveWorker::spawn(problem, options, backend);
    let mut report = None;
    while let Some(event) = handle.events.recv().await {
        match event {
            SolveEvent::Stage(SolveStage::Validating) => println!("[2/6] 校验问题..."),
            SolveEvent::Stage(SolveStage::BuildingModel) => println!("[3/6] 构建规划模型..."),
            SolveEvent::Stage(SolveStage::Solving) => println!("[4/6] 求解..."),
            SolveEvent::Stage(SolveStage::ExtractingSolution) => println!("[5/6] 提取方案..."),
            SolveEvent::Finished(r) => report = Some(*r),
            SolveEvent::Failed(message) => bail!("{}", message),
        }
    }
    let report = report.ok_or_else(|| anyhow!("求解任务未返回结果"))?;

    for warning in &report.warnings {
        println!("      警告: {}", warning);
    }
    println!(
        "      {} 变量 / {} 约束,状态 {},目标值 {:.2}",
        report.variables, report.constraints, report.plan.status, report.plan.objective_value
    );

    if let Some(out_dir) = &flags.out_dir {
        println!("[6/6] 导出结果到 {}", out_dir.display());
        let json_path = out_dir.join("plan.json");
        export_json(&report.plan, &json_path)?;
        let files = export_csv(&report.plan, out_dir, "plan")?;
        println!("      已写出 {} 个文件", files.len() + 1);
    } else {
        println!("[6/6] 未指定 --out,跳过导出");
    }

    println!();
    if flags.json {
        println!("{}", serde_json::to_string_pretty(&report.plan)?);
    } else {
        println!("{}", render_text_report(&report.plan, true));
    }
    Ok(ExitCode::SUCCESS)
}

// ==========================================
// validate - 只校验不求解
// ==========================================
async fn run_validate(args: &[String]) -> Result<ExitCode> {
    let source = args
        .first()
        .ok_or_else(|| anyhow!("validate 需要指定场景目录或问题 JSON 文件"))?;

    let problem = load_problem(source).await?;
    let report = PlanningApi::new().validate(&problem);

    for error in &report.errors {
        println!("错误: {}", error);
    }
    for warning in &report.warnings {
        println!("警告: {}", warning);
    }

    if report.is_valid() {
        println!(
            "校验通过 ({} 条警告)",
            report.warnings.len()
        );
        Ok(ExitCode::SUCCESS)
    } else {
        println!(
            "校验未通过: {} 条错误, {} 条警告",
            report.errors.len(),
            report.warnings.len()
        );
        Ok(ExitCode::FAILURE)
    }
}

// ==========================================
// templates / scenarios
// ==========================================
fn run_templates(args: &[String]) -> Result<ExitCode> {
    let dir = args
        .first()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data_templates"));
    let files = write_templates(&dir)?;
    println!("模板文件已写入 {}:", dir.display());
    for file in files {
        println!("  - {}", file.display());
    }
    Ok(ExitCode::SUCCESS)
}

fn run_scenarios(args: &[String]) -> Result<ExitCode> {
    println!("内置场景:");
    for name in scenario::names() {
        println!("  - {}", name);
    }

    let base_dir = args
        .first()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("scenarios"));
    if base_dir.is_dir() {
        let names = agri_plan::importer::list_scenarios(&base_dir)?;
        println!("磁盘场景 ({}):", base_dir.display());
        if names.is_empty() {
            println!("  (无)");
        }
        for name in names {
            println!("  - {}", name);
        }
    }
    Ok(ExitCode::SUCCESS)
}

// ==========================================
// 工具函数
// ==========================================

/// 问题来源: 内置场景名 / 场景目录 / 问题 JSON 文件
async fn load_problem(source: &str) -> Result<PlanningProblem> {
    if let Some(problem) = scenario::by_name(source) {
        return Ok(problem);
    }

    let path = Path::new(source);
    let importer = ScenarioImporterImpl::new();
    if path.is_dir() {
        Ok(importer.load_scenario(path).await?)
    } else if path.extension().and_then(|e| e.to_str()) == Some("json") {
        Ok(importer.load_problem_json(path).await?)
    } else {
        bail!(
            "无法识别的问题来源: {} (既不是内置场景,也不是场景目录或 .json 文件)",
            source
        )
    }
}

struct SolveFlags {
    overrides: CliOverrides,
    out_dir: Option<PathBuf>,
    json: bool,
    integer: bool,
}

/// 拆出位置参数与标志参数
fn split_flags(args: &[String]) -> Result<(Option<String>, SolveFlags)> {
    let mut source = None;
    let mut flags = SolveFlags {
        overrides: CliOverrides::default(),
        out_dir: None,
        json: false,
        integer: false,
    };

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--solver" => {
                let value = iter.next().ok_or_else(|| anyhow!("--solver 需要后端名称"))?;
                flags.overrides.backend = Some(value.clone());
            }
            "--time-limit" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--time-limit 需要秒数"))?;
                let secs: u64 = value
                    .parse()
                    .with_context(|| format!("无法解析时限: {}", value))?;
                flags.overrides.time_limit_secs = Some(secs);
            }
            "--out" => {
                let value = iter.next().ok_or_else(|| anyhow!("--out 需要目录路径"))?;
                let dir = PathBuf::from(value);
                flags.out_dir = Some(dir.clone());
                flags.overrides.output_dir = Some(dir);
            }
            "--json" => flags.json = true,
            "--integer" => flags.integer = true,
            "--verbose" => flags.overrides.verbose = Some(true),
            other if other.starts_with("--") => bail!("未知参数: {}", other),
            other => {
                if source.is_some() {
                    bail!("重复的位置参数: {}", other);
                }
                source = Some(other.to_string());
            }
        }
    }

    Ok((source, flags))
}
