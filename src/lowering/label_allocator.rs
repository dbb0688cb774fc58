//! Per-translation name allocation
//!
//! Every synthesized name — loop labels, case labels, hoisted temps —
//! comes from this allocator. It is owned by one translation and dropped
//! with it, so names are unique within a unit and two translations of the
//! same input produce identical output. Nothing here is process-global.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopKind {
    While,
    DoWhile,
    For,
    Foreach,
    Switch,
}

impl LoopKind {
    pub fn tag(&self) -> &'static str {
        match self {
            LoopKind::While => "while",
            LoopKind::DoWhile => "do",
            LoopKind::For => "for",
            LoopKind::Foreach => "foreach",
            LoopKind::Switch => "switch",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopLabels {
    pub start: String,
    pub end: String,
}

#[derive(Debug, Default)]
pub struct NameAllocator {
    while_labels: u32,
    do_labels: u32,
    for_labels: u32,
    foreach_labels: u32,
    switch_labels: u32,
    case_labels: u32,
    array_temps: u32,
    list_temps: u32,
    foreach_temps: u32,
    switch_temps: u32,
}

impl NameAllocator {
    pub fn new() -> NameAllocator {
        NameAllocator::default()
    }

    pub fn next_loop_labels(&mut self, kind: LoopKind) -> LoopLabels {
        let counter = match kind {
            LoopKind::While => &mut self.while_labels,
            LoopKind::DoWhile => &mut self.do_labels,
            LoopKind::For => &mut self.for_labels,
            LoopKind::Foreach => &mut self.foreach_labels,
            LoopKind::Switch => &mut self.switch_labels,
        };
        let n = *counter;
        *counter += 1;

        LoopLabels {
            start: format!("{}_begin_{}", kind.tag(), n),
            end: format!("{}_end_{}", kind.tag(), n),
        }
    }

    pub fn next_case_label(&mut self) -> String {
        let n = self.case_labels;
        self.case_labels += 1;
        format!("case_{}", n)
    }

    pub fn next_array_temp(&mut self) -> String {
        let n = self.array_temps;
        self.array_temps += 1;
        format!("array_tmp_{}", n)
    }

    pub fn next_list_temp(&mut self) -> String {
        let n = self.list_temps;
        self.list_temps += 1;
        format!("list_tmp_{}", n)
    }

    /// Snapshot and continuation-flag names for one foreach loop.
    pub fn next_foreach_temps(&mut self) -> (String, String) {
        let n = self.foreach_temps;
        self.foreach_temps += 1;
        (format!("foreach_src_{}", n), format!("foreach_more_{}", n))
    }

    pub fn next_switch_temp(&mut self) -> String {
        let n = self.switch_temps;
        self.switch_temps += 1;
        format!("switch_tmp_{}", n)
    }

    /// Field name for a promoted `static` variable. Deterministic so two
    /// translations of the same method agree.
    pub fn static_field_name(method: &str, variable: &str) -> String {
        format!("static_{}_{}", method, variable)
    }
}
