//! Reserved words and table hints.
//!
//! Both tables are matched case-insensitively. The enums and their lookups are
//! generated from a single word list so the two directions cannot drift apart.

macro_rules! word_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($variant:ident => $text:literal,)*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant,)*
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant,)*];

            /// Canonical upper-case spelling.
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text,)*
                }
            }

            /// Case-insensitive lookup; `None` when the word is not in the table.
            pub fn lookup(text: &str) -> Option<$name> {
                let upper = text.to_ascii_uppercase();
                match upper.as_str() {
                    $($text => Some($name::$variant),)*
                    _ => None,
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

word_enum! {
    /// T-SQL reserved keywords.
    pub enum Keyword {
        Add => "ADD",
        All => "ALL",
        Alter => "ALTER",
        And => "AND",
        Any => "ANY",
        As => "AS",
        Asc => "ASC",
        Authorization => "AUTHORIZATION",
        Backup => "BACKUP",
        Begin => "BEGIN",
        Between => "BETWEEN",
        Break => "BREAK",
        Browse => "BROWSE",
        Bulk => "BULK",
        By => "BY",
        Cascade => "CASCADE",
        Case => "CASE",
        Check => "CHECK",
        Checkpoint => "CHECKPOINT",
        Close => "CLOSE",
        Clustered => "CLUSTERED",
        Coalesce => "COALESCE",
        Collate => "COLLATE",
        Column => "COLUMN",
        Commit => "COMMIT",
        Compute => "COMPUTE",
        Constraint => "CONSTRAINT",
        Contains => "CONTAINS",
        Containstable => "CONTAINSTABLE",
        Continue => "CONTINUE",
        Convert => "CONVERT",
        Create => "CREATE",
        Cross => "CROSS",
        Current => "CURRENT",
        CurrentDate => "CURRENT_DATE",
        CurrentTime => "CURRENT_TIME",
        CurrentTimestamp => "CURRENT_TIMESTAMP",
        CurrentUser => "CURRENT_USER",
        Cursor => "CURSOR",
        Database => "DATABASE",
        Dbcc => "DBCC",
        Deallocate => "DEALLOCATE",
        Declare => "DECLARE",
        Default => "DEFAULT",
        Delete => "DELETE",
        Deny => "DENY",
        Desc => "DESC",
        Disk => "DISK",
        Distinct => "DISTINCT",
        Distributed => "DISTRIBUTED",
        Double => "DOUBLE",
        Drop => "DROP",
        Dump => "DUMP",
        Else => "ELSE",
        End => "END",
        Errlvl => "ERRLVL",
        Escape => "ESCAPE",
        Except => "EXCEPT",
        Exec => "EXEC",
        Execute => "EXECUTE",
        Exists => "EXISTS",
        Exit => "EXIT",
        External => "EXTERNAL",
        Fetch => "FETCH",
        File => "FILE",
        Fillfactor => "FILLFACTOR",
        For => "FOR",
        Foreign => "FOREIGN",
        Freetext => "FREETEXT",
        Freetexttable => "FREETEXTTABLE",
        From => "FROM",
        Full => "FULL",
        Function => "FUNCTION",
        Goto => "GOTO",
        Grant => "GRANT",
        Group => "GROUP",
        Having => "HAVING",
        Holdlock => "HOLDLOCK",
        Identity => "IDENTITY",
        IdentityInsert => "IDENTITY_INSERT",
        Identitycol => "IDENTITYCOL",
        If => "IF",
        In => "IN",
        Index => "INDEX",
        Inner => "INNER",
        Insert => "INSERT",
        Intersect => "INTERSECT",
        Into => "INTO",
        Is => "IS",
        Join => "JOIN",
        Key => "KEY",
        Kill => "KILL",
        Left => "LEFT",
        Like => "LIKE",
        Lineno => "LINENO",
        Load => "LOAD",
        Merge => "MERGE",
        National => "NATIONAL",
        Nocheck => "NOCHECK",
        Nonclustered => "NONCLUSTERED",
        Not => "NOT",
        Null => "NULL",
        Nullif => "NULLIF",
        Of => "OF",
        Off => "OFF",
        Offsets => "OFFSETS",
        On => "ON",
        Open => "OPEN",
        Opendatasource => "OPENDATASOURCE",
        Openquery => "OPENQUERY",
        Openrowset => "OPENROWSET",
        Openxml => "OPENXML",
        Option => "OPTION",
        Or => "OR",
        Order => "ORDER",
        Outer => "OUTER",
        Over => "OVER",
        Percent => "PERCENT",
        Pivot => "PIVOT",
        Plan => "PLAN",
        Precision => "PRECISION",
        Primary => "PRIMARY",
        Print => "PRINT",
        Proc => "PROC",
        Procedure => "PROCEDURE",
        Public => "PUBLIC",
        Raiserror => "RAISERROR",
        Read => "READ",
        Readtext => "READTEXT",
        Reconfigure => "RECONFIGURE",
        References => "REFERENCES",
        Replication => "REPLICATION",
        Restore => "RESTORE",
        Restrict => "RESTRICT",
        Return => "RETURN",
        Revert => "REVERT",
        Revoke => "REVOKE",
        Right => "RIGHT",
        Rollback => "ROLLBACK",
        Rowcount => "ROWCOUNT",
        Rowguidcol => "ROWGUIDCOL",
        Rule => "RULE",
        Save => "SAVE",
        Schema => "SCHEMA",
        Securityaudit => "SECURITYAUDIT",
        Select => "SELECT",
        Semantickeyphrasetable => "SEMANTICKEYPHRASETABLE",
        Semanticsimilaritydetailstable => "SEMANTICSIMILARITYDETAILSTABLE",
        Semanticsimilaritytable => "SEMANTICSIMILARITYTABLE",
        SessionUser => "SESSION_USER",
        Set => "SET",
        Setuser => "SETUSER",
        Shutdown => "SHUTDOWN",
        Some => "SOME",
        Statistics => "STATISTICS",
        SystemUser => "SYSTEM_USER",
        Table => "TABLE",
        Tablesample => "TABLESAMPLE",
        Textsize => "TEXTSIZE",
        Then => "THEN",
        To => "TO",
        Top => "TOP",
        Tran => "TRAN",
        Transaction => "TRANSACTION",
        Trigger => "TRIGGER",
        Truncate => "TRUNCATE",
        TryConvert => "TRY_CONVERT",
        Tsequal => "TSEQUAL",
        Union => "UNION",
        Unique => "UNIQUE",
        Unpivot => "UNPIVOT",
        Update => "UPDATE",
        Updatetext => "UPDATETEXT",
        Use => "USE",
        User => "USER",
        Values => "VALUES",
        Varying => "VARYING",
        View => "VIEW",
        Waitfor => "WAITFOR",
        When => "WHEN",
        Where => "WHERE",
        While => "WHILE",
        With => "WITH",
        Writetext => "WRITETEXT",
    }
}

word_enum! {
    /// Locking and optimizer directives accepted inside `WITH (...)`.
    pub enum TableHint {
        Nolock => "NOLOCK",
        Noexpand => "NOEXPAND",
        Forcescan => "FORCESCAN",
        Forceseek => "FORCESEEK",
        Holdlock => "HOLDLOCK",
        Nowait => "NOWAIT",
        Paglock => "PAGLOCK",
        Readcommitted => "READCOMMITTED",
        Readcommittedlock => "READCOMMITTEDLOCK",
        Readpast => "READPAST",
        Readuncommitted => "READUNCOMMITTED",
        Repeatableread => "REPEATABLEREAD",
        Rowlock => "ROWLOCK",
        Serializable => "SERIALIZABLE",
        Snapshot => "SNAPSHOT",
        SpatialWindowMaxCells => "SPATIAL_WINDOW_MAX_CELLS",
        Tablock => "TABLOCK",
        Tablockx => "TABLOCKX",
        Updlock => "UPDLOCK",
        Xlock => "XLOCK",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_lookup_ignores_case() {
        assert_eq!(Keyword::lookup("select"), Some(Keyword::Select));
        assert_eq!(Keyword::lookup("FRoM"), Some(Keyword::From));
        assert_eq!(Keyword::lookup("current_timestamp"), Some(Keyword::CurrentTimestamp));
        assert_eq!(Keyword::lookup("tb_table"), None);
    }

    #[test]
    fn every_keyword_maps_back_to_itself() {
        for keyword in Keyword::ALL {
            assert_eq!(Keyword::lookup(keyword.as_str()), Some(*keyword));
        }
        assert_eq!(Keyword::ALL.len(), 184);
    }

    #[test]
    fn table_hints() {
        assert_eq!(TableHint::lookup("nolock"), Some(TableHint::Nolock));
        assert_eq!(TableHint::lookup("TabLockX"), Some(TableHint::Tablockx));
        assert_eq!(TableHint::lookup("holdlock"), Some(TableHint::Holdlock));
        assert_eq!(TableHint::lookup("fastfirstrow"), None);
        assert_eq!(TableHint::SpatialWindowMaxCells.to_string(), "SPATIAL_WINDOW_MAX_CELLS");
    }
}
