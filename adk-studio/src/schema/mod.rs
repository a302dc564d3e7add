mod agent;
mod project;
mod tool;
mod workflow;

pub use agent::{AgentSchema, AgentType, Position, Route};
pub use project::{ProjectMeta, ProjectSchema, ProjectSettings};
pub use tool::{
    BrowserToolConfig, FunctionParameter, FunctionToolConfig, McpToolConfig, ParamType, ToolConfig,
    ToolSchema, ToolType, builtins,
};
pub use workflow::{Condition, END, Edge, START, WorkflowSchema, WorkflowType};
