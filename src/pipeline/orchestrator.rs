// ==========================================
// Excel 迁移工具 - 流水线编排器
// ==========================================
// 状态机: Configured → Extracted → Transformed → {DryRunDone | Loaded → Validated}
// 红线:
// - 严格顺序执行，任一阶段失败立即中止（无重试）
// - dry-run 从不连接目标数据库
// - 全量模式落库后必定校验
// - 存储连接每次运行获取一次，任何退出路径都会释放
// ==========================================

use crate::config::pipeline_config::{load_config, Configuration};
use crate::config::schema_describer::describe_schema;
use crate::domain::report::{PipelineReport, RowCountCheck};
use crate::domain::types::{PipelineStage, RunMode};
use crate::engine::sheet_cleaner::CleanedSheet;
use crate::engine::transformer::Transformer;
use crate::importer::excel_extractor::ExcelSheetExtractor;
use crate::importer::sheet_extractor_trait::SheetExtractor;
use crate::perf::StageTimer;
use crate::pipeline::error::{PipelineError, PipelineResult};
use crate::repository::error::StoreResult;
use crate::repository::sqlite_table_store::SqliteConnector;
use crate::repository::table_loader::TableLoader;
use crate::repository::table_store::{StoreConnector, TableStore};
use crate::validator::row_count_validator::RowCountValidator;
use std::path::{Path, PathBuf};
use tracing::{info, info_span, warn};
use uuid::Uuid;

// ==========================================
// PipelineOptions - 运行选项
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineOptions {
    /// 只抽取 + 清洗，不接触目标数据库
    pub dry_run: bool,
    /// Some 时写出 <sheet>_clean.csv 中间快照
    pub intermediate_dir: Option<PathBuf>,
}

impl PipelineOptions {
    pub fn full() -> Self {
        Self::default()
    }

    pub fn dry_run() -> Self {
        Self {
            dry_run: true,
            ..Self::default()
        }
    }

    pub fn with_intermediate_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.intermediate_dir = Some(dir.into());
        self
    }

    fn mode(&self) -> RunMode {
        if self.dry_run {
            RunMode::DryRun
        } else {
            RunMode::Full
        }
    }
}

// 阶段跟踪（只允许合法迁移）
struct StageTracker<'a> {
    run_id: &'a str,
    current: PipelineStage,
}

impl<'a> StageTracker<'a> {
    fn new(run_id: &'a str) -> Self {
        info!(run_id, stage = %PipelineStage::Configured, "流水线开始");
        Self {
            run_id,
            current: PipelineStage::Configured,
        }
    }

    fn advance(&mut self, next: PipelineStage) -> PipelineResult<()> {
        if !self.current.can_advance_to(next) {
            return Err(PipelineError::InvalidStageTransition {
                from: self.current,
                to: next,
            });
        }
        info!(run_id = self.run_id, from = %self.current, stage = %next, "阶段迁移");
        self.current = next;
        Ok(())
    }
}

// ==========================================
// MigrationPipeline - 迁移流水线
// ==========================================
pub struct MigrationPipeline<E = ExcelSheetExtractor, C = SqliteConnector>
where
    E: SheetExtractor,
    C: StoreConnector,
{
    extractor: E,
    connector: C,
    transformer: Transformer,
    loader: TableLoader,
    validator: RowCountValidator,
}

impl Default for MigrationPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl MigrationPipeline {
    /// Excel 抽取 + SQLite 落库
    pub fn new() -> Self {
        Self::with_components(ExcelSheetExtractor, SqliteConnector)
    }
}

impl<E, C> MigrationPipeline<E, C>
where
    E: SheetExtractor,
    C: StoreConnector,
{
    pub fn with_components(extractor: E, connector: C) -> Self {
        Self {
            extractor,
            connector,
            transformer: Transformer::new(),
            loader: TableLoader,
            validator: RowCountValidator,
        }
    }

    /// 执行一次完整迁移
    ///
    /// # 返回
    /// - dry-run: load_stats / row_counts 为空，validation_summary 为 None
    /// - 全量: 含落库统计与逐表校验结果
    ///
    /// # 错误
    /// 任一阶段的结构性错误；行数不一致不是错误
    pub fn run(
        &self,
        config: &Configuration,
        options: &PipelineOptions,
    ) -> PipelineResult<PipelineReport> {
        let run_id = Uuid::new_v4().to_string();
        let span = info_span!("pipeline", run_id = %run_id, mode = %options.mode());
        let _enter = span.enter();

        let mut stages = StageTracker::new(&run_id);
        let schema = describe_schema(&config.sheets);

        // 1) 抽取
        let extracted = {
            let mut timer = StageTimer::start(PipelineStage::Extracted);
            let sheet_names = config.sheet_names();
            let sheets = self.extractor.extract(&config.excel_path, &sheet_names)?;
            timer.record_rows(sheets.iter().map(|s| s.grid.row_count()).sum());
            sheets
        };
        stages.advance(PipelineStage::Extracted)?;

        // 2) 清洗
        let transformed = {
            let mut timer = StageTimer::start(PipelineStage::Transformed);
            let output = self.transformer.transform_all(
                &extracted,
                config,
                options.intermediate_dir.as_deref(),
            )?;
            timer.record_rows(output.sheets.iter().map(|s| s.stats.rows_clean).sum());
            output
        };
        stages.advance(PipelineStage::Transformed)?;

        let transform_stats = transformed
            .sheets
            .iter()
            .map(|s| (s.sheet_name.clone(), s.stats))
            .collect();

        let mut report = PipelineReport {
            run_id: run_id.clone(),
            mode: options.mode(),
            excel_path: config.excel_path.display().to_string(),
            database_url: config.database_url.clone(),
            schema,
            transform_stats,
            load_stats: Vec::new(),
            row_counts: Vec::new(),
            validation_summary: None,
        };

        // 3a) dry-run 短路
        if options.dry_run {
            stages.advance(PipelineStage::DryRunDone)?;
            info!(run_id = %run_id, "dry-run 完成，未写入数据库");
            return Ok(report);
        }

        // 3b) 落库 + 校验（连接在两阶段间共享，结束即释放）
        let mut store = self.connector.connect(&config.database_url)?;
        let outcome = self.load_and_validate(&mut *store, &transformed.sheets, config);
        let closed = store.close();
        let (load_stats, row_counts) = outcome?;
        closed?;

        stages.advance(PipelineStage::Loaded)?;
        stages.advance(PipelineStage::Validated)?;

        let summary = self.validator.summarize(&row_counts);
        if summary.all_match {
            info!(run_id = %run_id, tables = summary.total_tables, "全部表行数一致");
        } else {
            warn!(
                run_id = %run_id,
                matching = summary.matching_tables,
                total = summary.total_tables,
                "存在行数不一致的表"
            );
        }

        report.load_stats = load_stats;
        report.row_counts = row_counts;
        report.validation_summary = Some(summary);
        Ok(report)
    }

    #[allow(clippy::type_complexity)]
    fn load_and_validate(
        &self,
        store: &mut dyn TableStore,
        cleaned: &[CleanedSheet],
        config: &Configuration,
    ) -> StoreResult<(Vec<(String, usize)>, Vec<(String, RowCountCheck)>)> {
        let load_stats = {
            let mut timer = StageTimer::start(PipelineStage::Loaded);
            let stats = self.loader.load(cleaned, config, store)?;
            timer.record_rows(stats.iter().map(|(_, n)| n).sum());
            stats
        };

        let row_counts = {
            let _timer = StageTimer::start(PipelineStage::Validated);
            self.validator.validate(store, &load_stats)?
        };

        Ok((load_stats, row_counts))
    }
}

/// 读取配置文件并以默认组件运行
pub fn run_pipeline<P: AsRef<Path>>(
    config_path: P,
    options: &PipelineOptions,
) -> PipelineResult<PipelineReport> {
    let config = load_config(config_path)?;
    MigrationPipeline::new().run(&config, options)
}
