#![allow(dead_code)]

use std::path::PathBuf;

use oxide_ddl::prelude::*;
use tempfile::TempDir;

pub const OWNER: &str = "OWNER";

pub const ORDERS_DDL: &str = concat!(
    "\n  CREATE TABLE \"OWNER\".\"ORDERS\" \n",
    "   (\t\"ID\" NUMBER(10,0) NOT NULL ENABLE, \n",
    "\t\"CUSTOMER_ID\" NUMBER(10,0), \n",
    "\t\"STATUS\" VARCHAR2(20) DEFAULT 'NEW' NOT NULL ENABLE, \n",
    "\t CONSTRAINT \"UK_ORDERS_2\" UNIQUE (\"CUSTOMER_ID\", \"STATUS\")\n",
    "  USING INDEX  ENABLE, \n",
    "\t CONSTRAINT \"PK_ORDERS\" PRIMARY KEY (\"ID\")\n",
    "  USING INDEX  ENABLE, \n",
    "\t CONSTRAINT \"FK_ORDERS_CUSTOMER\" FOREIGN KEY (\"CUSTOMER_ID\")\n",
    "\t  REFERENCES \"OWNER\".\"CUSTOMERS\" (\"ID\") ENABLE\n",
    "   ) ;"
);

pub const ORDERS_COMMENTS_DDL: &str = concat!(
    "\n   COMMENT ON COLUMN \"OWNER\".\"ORDERS\".\"STATUS\" IS 'Order status';\n",
    "\n   COMMENT ON COLUMN \"OWNER\".\"ORDERS\".\"ID\" IS 'Primary key';\n",
    "\n   COMMENT ON TABLE \"OWNER\".\"ORDERS\"  IS 'Customer orders';\n"
);

pub const TRIGGER_DDL: &str = concat!(
    "\n  CREATE OR REPLACE EDITIONABLE TRIGGER \"OWNER\".\"TRG_ORDERS_BI\"\n",
    "BEFORE INSERT ON \"OWNER\".\"ORDERS\"\nFOR EACH ROW\n",
    "BEGIN\n  :NEW.ID := SEQ_ORDERS.NEXTVAL;\nEND;\n\n/\n",
    "ALTER TRIGGER \"OWNER\".\"TRG_ORDERS_BI\" ENABLE;\n"
);

/// Expected content of `tables/orders.sql`.
pub const ORDERS_FILE: &str = concat!(
    "CREATE TABLE ORDERS (\r\n",
    "    ID NUMBER(10,0) NOT NULL ENABLE, \r\n",
    "    CUSTOMER_ID NUMBER(10,0), \r\n",
    "    STATUS VARCHAR2(20) DEFAULT 'NEW' NOT NULL ENABLE, \r\n",
    "     CONSTRAINT FK_ORDERS_CUSTOMER FOREIGN KEY (CUSTOMER_ID) REFERENCES CUSTOMERS (ID) ENABLE,\r\n",
    "     CONSTRAINT PK_ORDERS PRIMARY KEY (ID),\r\n",
    "     CONSTRAINT UK_ORDERS_2 UNIQUE (CUSTOMER_ID, STATUS)\r\n",
    ");\r\n",
    "\r\n",
    "CREATE UNIQUE INDEX UK_ORDERS_1 ON ORDERS (CUSTOMER_ID);\r\n",
    "CREATE INDEX IX_ORDERS_2 ON ORDERS (STATUS);\r\n",
    "CREATE INDEX IX_ORDERS_10 ON ORDERS (CUSTOMER_ID, STATUS);\r\n",
    "\r\n",
    "COMMENT ON TABLE ORDERS  IS 'Customer orders';\r\n",
    "COMMENT ON COLUMN ORDERS.ID IS 'Primary key';\r\n",
    "COMMENT ON COLUMN ORDERS.STATUS IS 'Order status';\r\n",
    "\r\n",
    "CREATE SEQUENCE  SEQ_ORDERS;\r\n",
    "\r\n",
    "CREATE OR REPLACE TRIGGER TRG_ORDERS_BI\r\n",
    "BEFORE INSERT ON ORDERS\r\n",
    "FOR EACH ROW\r\n",
    "BEGIN\r\n",
    "  :NEW.ID := SEQ_ORDERS.NEXTVAL;\r\n",
    "END;\r\n",
    "/"
);

fn index(name: &str, unique: bool, columns: &str) -> SnapshotDependent {
    let kind = if unique { "UNIQUE INDEX" } else { "INDEX" };
    SnapshotDependent::index(
        name,
        "ORDERS",
        unique,
        &format!("\n  CREATE {kind} \"OWNER\".\"{name}\" ON \"OWNER\".\"ORDERS\" ({columns}) \n  ;"),
    )
}

/// Catalog with an `ORDERS` table and its dependents, a view, a package and
/// objects matched by the default exclusion rules.
pub fn catalog() -> SnapshotCatalog {
    SnapshotCatalog::default()
        .with_object("ORDERS", ObjectType::Table, ORDERS_DDL)
        .with_object("Z_ORDERS_TMP", ObjectType::Table, "CREATE TABLE \"OWNER\".\"Z_ORDERS_TMP\" (\"ID\" NUMBER) ;")
        .with_object(
            "V_ORDERS",
            ObjectType::View,
            "CREATE OR REPLACE FORCE EDITIONABLE VIEW \"OWNER\".\"V_ORDERS\" (\"ID\", \"STATUS\") AS \n  SELECT id, status FROM orders",
        )
        .with_object("VX_ORDERS", ObjectType::View, "CREATE OR REPLACE VIEW \"OWNER\".\"VX_ORDERS\" AS SELECT 1 FROM dual")
        .with_object(
            "PKG_ORDERS",
            ObjectType::PackageSpec,
            "\n  CREATE OR REPLACE EDITIONABLE PACKAGE \"OWNER\".\"PKG_ORDERS\" AS\n  PROCEDURE close_order(p_id NUMBER);\nEND pkg_orders;\n  /",
        )
        .with_object(
            "PKG_ORDERS",
            ObjectType::PackageBody,
            concat!(
                "\n  CREATE OR REPLACE EDITIONABLE PACKAGE BODY \"OWNER\".\"PKG_ORDERS\" AS\n",
                "  PROCEDURE close_order(p_id NUMBER) IS\n  BEGIN\n",
                "    -- mark as \"CLOSED\"\n",
                "    UPDATE \"ORDERS\" SET \"STATUS\" = 'CLOSED' WHERE \"ID\" = p_id;\n",
                "  END;\nEND pkg_orders;\n  /"
            ),
        )
        .with_object("PKGR_REPORT", ObjectType::PackageSpec, "CREATE OR REPLACE PACKAGE \"OWNER\".\"PKGR_REPORT\" AS\nEND;\n/")
        .with_dependent(index("IX_ORDERS_10", false, "\"CUSTOMER_ID\", \"STATUS\""))
        .with_dependent(index("PK_ORDERS", true, "\"ID\""))
        .with_dependent(index("IX_ORDERS_2", false, "\"STATUS\""))
        .with_dependent(index("UK_ORDERS_1", true, "\"CUSTOMER_ID\""))
        .with_dependent(SnapshotDependent::index("IX_LOST_1", "LOST_TABLE", false, ""))
        .with_dependent(SnapshotDependent::comment("ORDERS", ORDERS_COMMENTS_DDL))
        .with_dependent(SnapshotDependent::comment(
            "V_ORDERS",
            "\n   COMMENT ON TABLE \"OWNER\".\"V_ORDERS\"  IS 'Open orders';\n",
        ))
        .with_dependent(SnapshotDependent::trigger("TRG_ORDERS_BI", "ORDERS", TRIGGER_DDL))
        .with_dependent(SnapshotDependent::sequence(
            "SEQ_ORDERS",
            "TRG_ORDERS_BI",
            " CREATE SEQUENCE  \"OWNER\".\"SEQ_ORDERS\"  MINVALUE 1 MAXVALUE 9999999999 INCREMENT BY 1 START WITH 1041 CACHE 20 NOORDER  NOCYCLE  NOKEEP  GLOBAL ;",
        ))
        .with_dependent(SnapshotDependent::sequence(
            "SEQ_BPD_ITEMS_UNIT_ID",
            "TRG_ORDERS_BI",
            " CREATE SEQUENCE  \"OWNER\".\"SEQ_BPD_ITEMS_UNIT_ID\"  MINVALUE 1 CACHE 20 ;",
        ))
}

/// A throwaway DDL directory.
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        Self { dir }
    }

    pub fn config(&self) -> GeneratorConfig {
        GeneratorConfig::new(self.dir.path(), OWNER)
    }

    pub fn generator(&self) -> DdlGenerator<SnapshotCatalog> {
        DdlGenerator::new(catalog(), self.config())
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    pub fn read(&self, relative: &str) -> String {
        std::fs::read_to_string(self.path(relative))
            .unwrap_or_else(|e| panic!("Failed to read {relative}: {e}"))
    }

    pub fn touch(&self, relative: &str) {
        let path = self.path(relative);
        std::fs::create_dir_all(path.parent().expect("file has a parent")).unwrap();
        std::fs::write(path, "-- stale").unwrap();
    }
}

pub fn object(spec: &str) -> DbObject {
    spec.parse()
        .unwrap_or_else(|e| panic!("Invalid object {spec}: {e}"))
}
