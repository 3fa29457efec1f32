//! Enumerations used by step metadata
//!
//! Enumerated attributes are stored by their description, never by
//! position, so reordering a declaration does not change what a saved
//! document means. Each enumeration keeps a static table of
//! `variant ↔ code ↔ description`; [`validate_enum_table`] checks that the
//! table is a bijection and runs once during environment bootstrap.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Enumeration with a stable, human readable description per value
pub trait DescribedEnum: Copy + Eq + fmt::Debug + Send + Sync + 'static {
    /// Name used in reports and value type declarations
    const TYPE_NAME: &'static str;

    /// Every value of the enumeration
    fn values() -> &'static [Self];

    /// Short machine code
    fn code(&self) -> &'static str;

    /// Description written to XML
    fn description(&self) -> &'static str;

    /// Look a value up by description, falling back to its code.
    ///
    /// Matching is case-insensitive.
    fn from_description(text: &str) -> Option<Self> {
        let values = Self::values();
        values
            .iter()
            .find(|v| v.description().eq_ignore_ascii_case(text))
            .or_else(|| values.iter().find(|v| v.code().eq_ignore_ascii_case(text)))
            .copied()
    }
}

/// Check that an enumeration's table is complete and unambiguous.
///
/// Every value must appear once, and every description and code must
/// resolve back to the value that owns it.
pub fn validate_enum_table<E: DescribedEnum>() -> Result<(), String> {
    let values = E::values();
    if values.is_empty() {
        return Err(format!("{} declares no values", E::TYPE_NAME));
    }

    let mut seen: HashMap<String, E> = HashMap::new();
    for (index, value) in values.iter().enumerate() {
        if values[..index].contains(value) {
            return Err(format!("{}: {:?} listed twice", E::TYPE_NAME, value));
        }
        for key in [value.description(), value.code()] {
            let folded = key.to_ascii_lowercase();
            if let Some(owner) = seen.get(&folded)
                && owner != value
            {
                return Err(format!(
                    "{}: '{}' is used by both {:?} and {:?}",
                    E::TYPE_NAME,
                    key,
                    owner,
                    value
                ));
            }
            seen.insert(folded, *value);
        }
        if E::from_description(value.description()) != Some(*value) {
            return Err(format!(
                "{}: description '{}' does not resolve to {:?}",
                E::TYPE_NAME,
                value.description(),
                value
            ));
        }
    }
    Ok(())
}

/// Kind of system information produced by the "Get System Info" step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SystemDataType {
    #[default]
    None,
    SystemDate,
    SystemStart,
    TransDateFrom,
    TransDateTo,
    JobDateFrom,
    JobDateTo,
    PrevDayStart,
    PrevDayEnd,
    ThisDayStart,
    ThisDayEnd,
    NextDayStart,
    NextDayEnd,
    PrevMonthStart,
    PrevMonthEnd,
    ThisMonthStart,
    ThisMonthEnd,
    NextMonthStart,
    NextMonthEnd,
    CopyNr,
    TransName,
    Filename,
    ModifiedUser,
    ModifiedDate,
    BatchId,
    JobBatchId,
    Hostname,
    HostnameReal,
    IpAddress,
    Argument01,
    Argument02,
    Argument03,
    Argument04,
    Argument05,
    Argument06,
    Argument07,
    Argument08,
    Argument09,
    Argument10,
    KettleVersion,
    KettleBuildVersion,
    KettleBuildDate,
    CurrentPid,
    JvmMaxMemory,
    JvmTotalMemory,
    JvmFreeMemory,
    JvmAvailableMemory,
    AvailableProcessors,
    JvmCpuTime,
    TotalPhysicalMemorySize,
    TotalSwapSpaceSize,
    CommittedVirtualMemorySize,
    FreePhysicalMemorySize,
    FreeSwapSpaceSize,
    PrevWeekStart,
    PrevWeekEnd,
    ThisWeekStart,
    ThisWeekEnd,
    NextWeekStart,
    NextWeekEnd,
    PrevQuarterStart,
    PrevQuarterEnd,
    ThisQuarterStart,
    ThisQuarterEnd,
    NextQuarterStart,
    NextQuarterEnd,
    PrevYearStart,
    PrevYearEnd,
    ThisYearStart,
    ThisYearEnd,
    NextYearStart,
    NextYearEnd,
    PreviousResultResult,
    PreviousResultExitStatus,
    PreviousResultEntryNr,
    PreviousResultNrErrors,
    PreviousResultNrLinesInput,
    PreviousResultNrLinesOutput,
    PreviousResultNrLinesRead,
    PreviousResultNrLinesUpdated,
    PreviousResultNrLinesWritten,
    PreviousResultNrLinesDeleted,
    PreviousResultNrLinesRejected,
    PreviousResultNrRows,
    PreviousResultIsStopped,
    PreviousResultNrFiles,
    PreviousResultNrFilesRetrieved,
    PreviousResultLogText,
}

const SYSTEM_DATA_TYPES: &[SystemDataType] = {
    use SystemDataType::*;
    &[
        None,
        SystemDate,
        SystemStart,
        TransDateFrom,
        TransDateTo,
        JobDateFrom,
        JobDateTo,
        PrevDayStart,
        PrevDayEnd,
        ThisDayStart,
        ThisDayEnd,
        NextDayStart,
        NextDayEnd,
        PrevMonthStart,
        PrevMonthEnd,
        ThisMonthStart,
        ThisMonthEnd,
        NextMonthStart,
        NextMonthEnd,
        CopyNr,
        TransName,
        Filename,
        ModifiedUser,
        ModifiedDate,
        BatchId,
        JobBatchId,
        Hostname,
        HostnameReal,
        IpAddress,
        Argument01,
        Argument02,
        Argument03,
        Argument04,
        Argument05,
        Argument06,
        Argument07,
        Argument08,
        Argument09,
        Argument10,
        KettleVersion,
        KettleBuildVersion,
        KettleBuildDate,
        CurrentPid,
        JvmMaxMemory,
        JvmTotalMemory,
        JvmFreeMemory,
        JvmAvailableMemory,
        AvailableProcessors,
        JvmCpuTime,
        TotalPhysicalMemorySize,
        TotalSwapSpaceSize,
        CommittedVirtualMemorySize,
        FreePhysicalMemorySize,
        FreeSwapSpaceSize,
        PrevWeekStart,
        PrevWeekEnd,
        ThisWeekStart,
        ThisWeekEnd,
        NextWeekStart,
        NextWeekEnd,
        PrevQuarterStart,
        PrevQuarterEnd,
        ThisQuarterStart,
        ThisQuarterEnd,
        NextQuarterStart,
        NextQuarterEnd,
        PrevYearStart,
        PrevYearEnd,
        ThisYearStart,
        ThisYearEnd,
        NextYearStart,
        NextYearEnd,
        PreviousResultResult,
        PreviousResultExitStatus,
        PreviousResultEntryNr,
        PreviousResultNrErrors,
        PreviousResultNrLinesInput,
        PreviousResultNrLinesOutput,
        PreviousResultNrLinesRead,
        PreviousResultNrLinesUpdated,
        PreviousResultNrLinesWritten,
        PreviousResultNrLinesDeleted,
        PreviousResultNrLinesRejected,
        PreviousResultNrRows,
        PreviousResultIsStopped,
        PreviousResultNrFiles,
        PreviousResultNrFilesRetrieved,
        PreviousResultLogText,
    ]
};

impl SystemDataType {
    /// `(code, description)` pair for this value
    fn entry(&self) -> (&'static str, &'static str) {
        use SystemDataType::*;
        match self {
            None => ("", ""),
            SystemDate => ("system date (variable)", "System date (variable)"),
            SystemStart => ("system date (fixed)", "System date (fixed)"),
            TransDateFrom => ("start date range", "Start date range"),
            TransDateTo => ("end date range", "End date range"),
            JobDateFrom => ("job start date range", "Start date range (job)"),
            JobDateTo => ("job end date range", "End date range (job)"),
            PrevDayStart => ("yesterday start", "Yesterday 00:00:00"),
            PrevDayEnd => ("yesterday end", "Yesterday 23:59:59"),
            ThisDayStart => ("today start", "Today 00:00:00"),
            ThisDayEnd => ("today end", "Today 23:59:59"),
            NextDayStart => ("tomorrow start", "Tomorrow 00:00:00"),
            NextDayEnd => ("tomorrow end", "Tomorrow 23:59:59"),
            PrevMonthStart => ("last month start", "First day of last month 00:00:00"),
            PrevMonthEnd => ("last month end", "Last day of last month 23:59:59"),
            ThisMonthStart => ("this month start", "First day of this month 00:00:00"),
            ThisMonthEnd => ("this month end", "Last day of this month 23:59:59"),
            NextMonthStart => ("next month start", "First day of next month 00:00:00"),
            NextMonthEnd => ("next month end", "Last day of next month 23:59:59"),
            CopyNr => ("copy of step", "Copy of step"),
            TransName => ("transformation name", "Transformation name"),
            Filename => ("transformation file name", "Transformation file name"),
            ModifiedUser => (
                "User modified",
                "User that modified the transformation last",
            ),
            ModifiedDate => (
                "Date modified",
                "Date when the transformation was modified last",
            ),
            BatchId => ("batch ID", "Transformation batch ID"),
            JobBatchId => ("job batch ID", "Parent job batch ID"),
            Hostname => ("hostname", "Hostname"),
            HostnameReal => ("hostname_real", "Hostname real"),
            IpAddress => ("IP address", "IP address"),
            Argument01 => ("command line argument 1", "Command line argument 1"),
            Argument02 => ("command line argument 2", "Command line argument 2"),
            Argument03 => ("command line argument 3", "Command line argument 3"),
            Argument04 => ("command line argument 4", "Command line argument 4"),
            Argument05 => ("command line argument 5", "Command line argument 5"),
            Argument06 => ("command line argument 6", "Command line argument 6"),
            Argument07 => ("command line argument 7", "Command line argument 7"),
            Argument08 => ("command line argument 8", "Command line argument 8"),
            Argument09 => ("command line argument 9", "Command line argument 9"),
            Argument10 => ("command line argument 10", "Command line argument 10"),
            KettleVersion => ("kettle version", "Kettle version"),
            KettleBuildVersion => ("kettle build version", "Kettle Build Version"),
            KettleBuildDate => ("kettle build date", "Kettle Build Date"),
            CurrentPid => ("Current PID", "Current PID"),
            JvmMaxMemory => ("jvm max memory", "Jvm max memory"),
            JvmTotalMemory => ("jvm total memory", "Jvm total memory"),
            JvmFreeMemory => ("jvm free memory", "Jvm free memory"),
            JvmAvailableMemory => ("jvm available memory", "Jvm available memory"),
            AvailableProcessors => ("available processors", "Available processors"),
            JvmCpuTime => ("jvm cpu time", "JVM CPU time (milliseconds)"),
            TotalPhysicalMemorySize => (
                "total physical memory size",
                "Total physical memory size (bytes)",
            ),
            TotalSwapSpaceSize => ("total swap space size", "Total swap space size (bytes)"),
            CommittedVirtualMemorySize => (
                "committed virtual memory size",
                "Committed virtual memory size (bytes)",
            ),
            FreePhysicalMemorySize => (
                "free physical memory size",
                "Free physical memory size (bytes)",
            ),
            FreeSwapSpaceSize => ("free swap space size", "Free swap space size (bytes)"),
            PrevWeekStart => ("last week start", "Last week Monday 00:00:00"),
            PrevWeekEnd => ("last week end", "Last week Sunday 23:59:59"),
            ThisWeekStart => ("this week start", "This week Monday 00:00:00"),
            ThisWeekEnd => ("this week end", "This week Sunday 23:59:59"),
            NextWeekStart => ("next week start", "Next week Monday 00:00:00"),
            NextWeekEnd => ("next week end", "Next week Sunday 23:59:59"),
            PrevQuarterStart => ("prev quarter start", "Previous quarter start"),
            PrevQuarterEnd => ("prev quarter end", "Previous quarter end"),
            ThisQuarterStart => ("this quarter start", "This quarter start"),
            ThisQuarterEnd => ("this quarter end", "This quarter end"),
            NextQuarterStart => ("next quarter start", "Next quarter start"),
            NextQuarterEnd => ("next quarter end", "Next quarter end"),
            PrevYearStart => ("prev year start", "Previous year start"),
            PrevYearEnd => ("prev year end", "Previous year end"),
            ThisYearStart => ("this year start", "This year start"),
            ThisYearEnd => ("this year end", "This year end"),
            NextYearStart => ("next year start", "Next year start"),
            NextYearEnd => ("next year end", "Next year end"),
            PreviousResultResult => ("previous result result", "Previous result result"),
            PreviousResultExitStatus => (
                "previous result exist status",
                "Previous result exit status",
            ),
            PreviousResultEntryNr => ("previous result entry nr", "Previous result entry nr"),
            PreviousResultNrErrors => ("previous result nr errors", "Previous result nr errors"),
            PreviousResultNrLinesInput => (
                "previous result nr lines input",
                "Previous result nr lines input",
            ),
            PreviousResultNrLinesOutput => (
                "previous result nr lines output",
                "Previous result nr lines output",
            ),
            PreviousResultNrLinesRead => (
                "previous result nr lines read",
                "Previous result nr lines read",
            ),
            PreviousResultNrLinesUpdated => (
                "previous result nr lines updated",
                "Previous result nr lines updated",
            ),
            PreviousResultNrLinesWritten => (
                "previous result nr lines written",
                "Previous result nr lines written",
            ),
            PreviousResultNrLinesDeleted => (
                "previous result nr lines deleted",
                "Previous result nr lines deleted",
            ),
            PreviousResultNrLinesRejected => (
                "previous result nr lines rejected",
                "Previous result nr lines rejected",
            ),
            PreviousResultNrRows => ("previous result nr rows", "Previous result nr rows"),
            PreviousResultIsStopped => ("previous result is stopped", "Previous result is stopped"),
            PreviousResultNrFiles => ("previous result nr files", "Previous result nr files"),
            PreviousResultNrFilesRetrieved => (
                "previous result nr files retrieved",
                "Previous result nr files retrieved",
            ),
            PreviousResultLogText => ("previous result log text", "Previous result log text"),
        }
    }

    /// Resolve a stored type string, mapping unknown text to [`SystemDataType::None`]
    pub fn get_type_from_string(text: &str) -> Self {
        Self::from_description(text).unwrap_or_default()
    }
}

impl DescribedEnum for SystemDataType {
    const TYPE_NAME: &'static str = "SystemDataType";

    fn values() -> &'static [Self] {
        SYSTEM_DATA_TYPES
    }

    fn code(&self) -> &'static str {
        self.entry().0
    }

    fn description(&self) -> &'static str {
        self.entry().1
    }
}

impl fmt::Display for SystemDataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

impl FromStr for SystemDataType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_description(s).ok_or_else(|| format!("Unknown system data type: {}", s))
    }
}

impl serde::Serialize for SystemDataType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.description())
    }
}

impl<'de> serde::Deserialize<'de> for SystemDataType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        SystemDataType::from_str(&s).map_err(serde::de::Error::custom)
    }
}
