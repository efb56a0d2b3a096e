//! # Handler Module / 处理器模块
//!
//! A handler is an optional collaborator that contributes extra processing
//! parameters. Its values override the runner's own on key collision.
//!
//! 处理器是可选的协作者，用于提供额外的处理参数。键冲突时其值覆盖运行器自身的参数。

use crate::core::models::Params;

/// Supplies additional processing parameters to a runner.
/// 为运行器提供附加处理参数。
pub trait Handler: Send + Sync {
    fn additional_parameters(&self) -> Params;
}

/// A handler that always returns the same parameters.
/// 始终返回相同参数的处理器。
#[derive(Debug, Clone, Default)]
pub struct StaticHandler {
    params: Params,
}

impl StaticHandler {
    pub fn new(params: Params) -> Self {
        Self { params }
    }
}

impl Handler for StaticHandler {
    fn additional_parameters(&self) -> Params {
        self.params.clone()
    }
}
