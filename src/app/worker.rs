// ==========================================
// 农业种植规划系统 - 求解工作线程
// ==========================================
// 职责: 把阻塞的求解管线移出调用方线程,按阶段回报进度事件
// 红线: 事件发送为 best-effort,接收端关闭不得引发 panic
// 取消: 协作式,阶段之间检查取消标志;求解库内部由时限兜底
// ==========================================

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;
use uuid::Uuid;

use crate::api::error::{ApiError, ApiResult};
use crate::api::planning_api::SolveReport;
use crate::domain::problem::PlanningProblem;
use crate::engine::model_builder::ModelBuilder;
use crate::engine::solution::SolutionExtractor;
use crate::engine::validator::ProblemValidator;
use crate::perf::PerfGuard;
use crate::solver::{SolveOptions, SolverBackend};

/// 求解管线阶段(按执行顺序)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStage {
    Validating,
    BuildingModel,
    Solving,
    ExtractingSolution,
}

impl std::fmt::Display for SolveStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            SolveStage::Validating => "校验问题",
            SolveStage::BuildingModel => "构建模型",
            SolveStage::Solving => "求解",
            SolveStage::ExtractingSolution => "提取方案",
        };
        write!(f, "{}", label)
    }
}

/// 工作线程回报的事件
#[derive(Debug)]
pub enum SolveEvent {
    /// 即将进入某阶段
    Stage(SolveStage),
    /// 管线完成,携带完整求解报告
    Finished(Box<SolveReport>),
    /// 管线失败或被取消
    Failed(String),
}

// ==========================================
// SolveHandle - 一次求解任务的句柄
// ==========================================
pub struct SolveHandle {
    pub job_id: Uuid,
    /// 阶段/完成/失败事件流
    pub events: mpsc::UnboundedReceiver<SolveEvent>,
    cancelled: Arc<AtomicBool>,
    join: tokio::task::JoinHandle<ApiResult<SolveReport>>,
}

impl SolveHandle {
    /// 请求取消:下一次阶段检查点生效
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        tracing::info!(job_id = %self.job_id, "求解任务收到取消请求");
    }

    /// 等待任务结束并取回最终结果
    pub async fn join(self) -> ApiResult<SolveReport> {
        match self.join.await {
            Ok(result) => result,
            Err(e) => Err(ApiError::InternalError(format!("求解任务异常终止: {}", e))),
        }
    }
}

// ==========================================
// SolveWorker - 阻塞求解的异步外壳
// ==========================================
pub struct SolveWorker;

impl SolveWorker {
    /// 在阻塞线程池上启动完整求解管线
    ///
    /// # 参数
    /// - problem: 规划问题(任务持有副本)
    /// - options: 求解选项
    /// - backend: 求解后端
    ///
    /// # 说明
    /// 必须在 tokio 运行时上下文内调用;每个阶段开始前发送
    /// Stage 事件,结束时发送 Finished 或 Failed
    pub fn spawn(
        problem: PlanningProblem,
        options: SolveOptions,
        backend: Arc<dyn SolverBackend>,
    ) -> SolveHandle {
        let job_id = Uuid::new_v4();
        let (tx, rx) = mpsc::unbounded_channel();
        let cancelled = Arc::new(AtomicBool::new(false));
        let cancel_flag = cancelled.clone();

        tracing::info!(job_id = %job_id, backend = backend.name(), "启动求解任务");

        let join = tokio::task::spawn_blocking(move || {
            let result = run_pipeline(&problem, &options, backend.as_ref(), &cancel_flag, &tx);
            match &result {
                Ok(report) => {
                    let _ = tx.send(SolveEvent::Finished(Box::new(report.clone())));
                }
                Err(e) => {
                    let _ = tx.send(SolveEvent::Failed(e.to_string()));
                }
            }
            result
        });

        SolveHandle {
            job_id,
            events: rx,
            cancelled,
            join,
        }
    }
}

/// 阶段化执行管线,阶段之间检查取消标志
fn run_pipeline(
    problem: &PlanningProblem,
    options: &SolveOptions,
    backend: &dyn SolverBackend,
    cancelled: &AtomicBool,
    tx: &mpsc::UnboundedSender<SolveEvent>,
) -> ApiResult<SolveReport> {
    let _perf = PerfGuard::new("worker_solve_pipeline");

    let enter_stage = |stage: SolveStage| -> ApiResult<()> {
        if cancelled.load(Ordering::SeqCst) {
            return Err(ApiError::Cancelled);
        }
        let _ = tx.send(SolveEvent::Stage(stage));
        Ok(())
    };

    enter_stage(SolveStage::Validating)?;
    let report = ProblemValidator::new().validate(problem);
    if !report.is_valid() {
        return Err(ApiError::ValidationFailed(report.errors.join("; ")));
    }

    enter_stage(SolveStage::BuildingModel)?;
    let model = ModelBuilder::new().build(problem)?;

    enter_stage(SolveStage::Solving)?;
    let outcome = backend.solve(&model, options)?;

    enter_stage(SolveStage::ExtractingSolution)?;
    let plan = SolutionExtractor::new().extract(problem, &model, &outcome);

    Ok(SolveReport {
        variables: model.num_variables(),
        constraints: model.num_constraints(),
        plan,
        warnings: report.warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario;
    use crate::solver::MicrolpBackend;

    #[tokio::test]
    async fn test_worker_emits_stages_in_order() {
        let problem = scenario::basic();
        let mut handle = SolveWorker::spawn(
            problem,
            SolveOptions::default(),
            Arc::new(MicrolpBackend::new()),
        );

        let mut stages = Vec::new();
        let mut finished = false;
        while let Some(event) = handle.events.recv().await {
            match event {
                SolveEvent::Stage(stage) => stages.push(stage),
                SolveEvent::Finished(report) => {
                    finished = true;
                    assert!(!report.plan.allocations.is_empty());
                }
                SolveEvent::Failed(message) => panic!("unexpected failure: {message}"),
            }
        }

        assert!(finished);
        assert_eq!(
            stages,
            vec![
                SolveStage::Validating,
                SolveStage::BuildingModel,
                SolveStage::Solving,
                SolveStage::ExtractingSolution,
            ]
        );
    }

    #[tokio::test]
    async fn test_worker_join_returns_report() {
        let problem = scenario::basic();
        let handle = SolveWorker::spawn(
            problem,
            SolveOptions::default(),
            Arc::new(MicrolpBackend::new()),
        );

        let report = handle.join().await.unwrap();
        assert!(report.variables > 0);
        assert!(report.plan.kpis.total_profit > 0.0);
    }

    #[tokio::test]
    async fn test_worker_reports_validation_failure() {
        let mut problem = scenario::basic();
        problem.crops.clear();

        let handle = SolveWorker::spawn(
            problem,
            SolveOptions::default(),
            Arc::new(MicrolpBackend::new()),
        );

        let err = handle.join().await.unwrap_err();
        assert_eq!(err.code(), "VALIDATION_FAILED");
    }

    #[tokio::test]
    async fn test_cancel_before_start_fails_with_cancelled() {
        let problem = scenario::basic();
        let handle = SolveWorker::spawn(
            problem,
            SolveOptions::default(),
            Arc::new(MicrolpBackend::new()),
        );

        // 在第一个检查点前打取消标志;若任务已跑完则结果也可接受
        handle.cancel();
        match handle.join().await {
            Err(e) => {
                assert_eq!(e.code(), "CANCELLED");
                assert_eq!(e.to_string(), "已取消");
            }
            Ok(report) => assert!(report.variables > 0),
        }
    }

    #[tokio::test]
    async fn test_dropping_receiver_does_not_poison_result() {
        let problem = scenario::basic();
        let mut handle = SolveWorker::spawn(
            problem,
            SolveOptions::default(),
            Arc::new(MicrolpBackend::new()),
        );

        // 调用方不关心事件,直接关闭接收端
        handle.events.close();
        let report = handle.join().await.unwrap();
        assert!(report.plan.kpis.total_profit > 0.0);
    }
}
