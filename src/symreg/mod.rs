pub mod ast;
pub mod eval;
pub mod mapper;

pub use ast::{BinaryOp, Expr, UnaryOp};
pub use eval::RegressionEvaluator;
pub use mapper::{ExprMapper, GeneCursor};
